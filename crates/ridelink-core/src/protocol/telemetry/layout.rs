/// Controller status report: odometer, trip, range, battery, faults.
pub const STATUS_COMMAND: u8 = 0x11;
pub const STATUS_PAYLOAD_LEN: usize = 15;

pub const ODOMETER_RANGE: std::ops::Range<usize> = 0..3;
pub const TOTAL_TIME_RANGE: std::ops::Range<usize> = 3..6;
pub const TRIP_DISTANCE_RANGE: std::ops::Range<usize> = 6..8;
pub const TRIP_TIME_RANGE: std::ops::Range<usize> = 8..11;
pub const REMAINING_RANGE_OFFSET: usize = 11;
// Byte 12 is reserved and not decoded.
pub const BATTERY_PERCENT_OFFSET: usize = 13;
pub const ERROR_FLAGS_OFFSET: usize = 14;

pub const CONTROLLER_FAULT_BIT: u8 = 0x01;
pub const DISPLAY_FAULT_BIT: u8 = 0x02;
pub const BATTERY_FAULT_BIT: u8 = 0x04;
pub const CURRENT_LIMIT_BIT: u8 = 0x08;
