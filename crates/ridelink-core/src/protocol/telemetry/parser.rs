use serde::{Deserialize, Serialize};

use super::error::TelemetryError;
use super::faults::{Fault, FaultFlags};
use super::layout;
use super::reader::TelemetryReader;

/// Decoded controller status report (command `0x11`).
///
/// Distances are carried both as raw tenths and as one-decimal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub odometer: f64,
    pub odometer_tenths: u32,
    pub total_time: u32,
    pub trip_distance: f64,
    pub trip_distance_tenths: u16,
    pub trip_time: u32,
    pub remaining_range: u8,
    pub battery_percent: u8,
    pub error_flags: FaultFlags,
    pub faults: Vec<Fault>,
}

impl TelemetryRecord {
    /// Human-readable fault list, or "no faults".
    pub fn fault_summary(&self) -> String {
        self.error_flags.describe()
    }
}

/// Telemetry decoded from a recognized command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Telemetry {
    Status(TelemetryRecord),
}

impl Telemetry {
    pub fn command(&self) -> u8 {
        match self {
            Telemetry::Status(_) => layout::STATUS_COMMAND,
        }
    }
}

/// Whether `command` has a payload decoder.
pub fn is_known_command(command: u8) -> bool {
    command == layout::STATUS_COMMAND
}

/// Decode the payload of a verified frame.
///
/// Returns `None` for commands without a decoder; those frames are still
/// valid, they just carry nothing this crate understands.
///
/// # Examples
/// ```
/// use ridelink_core::protocol::telemetry::{Telemetry, decode};
///
/// let mut payload = [0u8; 15];
/// payload[13] = 80;
/// let Some(Ok(Telemetry::Status(record))) = decode(0x11, &payload) else {
///     panic!("status frame expected");
/// };
/// assert_eq!(record.battery_percent, 80);
/// assert!(decode(0x20, &payload).is_none());
/// ```
pub fn decode(command: u8, payload: &[u8]) -> Option<Result<Telemetry, TelemetryError>> {
    match command {
        layout::STATUS_COMMAND => Some(parse_status(payload).map(Telemetry::Status)),
        _ => None,
    }
}

/// Decode a status payload. No partial record is produced on short input.
pub fn parse_status(payload: &[u8]) -> Result<TelemetryRecord, TelemetryError> {
    let reader = TelemetryReader::new(payload);
    reader.require_len(layout::STATUS_PAYLOAD_LEN)?;

    let odometer_tenths = reader.read_u24_le(layout::ODOMETER_RANGE)?;
    let total_time = reader.read_u24_le(layout::TOTAL_TIME_RANGE)?;
    let trip_distance_tenths = reader.read_u16_le(layout::TRIP_DISTANCE_RANGE)?;
    let trip_time = reader.read_u24_le(layout::TRIP_TIME_RANGE)?;
    let remaining_range = reader.read_u8(layout::REMAINING_RANGE_OFFSET)?;
    let battery_percent = reader.read_u8(layout::BATTERY_PERCENT_OFFSET)?;
    let error_flags = FaultFlags(reader.read_u8(layout::ERROR_FLAGS_OFFSET)?);

    Ok(TelemetryRecord {
        odometer: tenths(odometer_tenths),
        odometer_tenths,
        total_time,
        trip_distance: tenths(trip_distance_tenths as u32),
        trip_distance_tenths,
        trip_time,
        remaining_range,
        battery_percent,
        error_flags,
        faults: error_flags.faults(),
    })
}

fn tenths(raw: u32) -> f64 {
    raw as f64 / 10.0
}
