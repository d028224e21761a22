use serde::{Deserialize, Serialize};

use super::layout;

/// Label used when no fault bit is set.
pub const NO_FAULTS: &str = "no faults";

/// One fault condition signalled in the status error byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fault {
    ControllerFault,
    DisplayFault,
    BatteryFault,
    CurrentLimiting,
}

impl Fault {
    /// All known faults, in bit order.
    pub const ALL: [Fault; 4] = [
        Fault::ControllerFault,
        Fault::DisplayFault,
        Fault::BatteryFault,
        Fault::CurrentLimiting,
    ];

    pub fn bit(self) -> u8 {
        match self {
            Fault::ControllerFault => layout::CONTROLLER_FAULT_BIT,
            Fault::DisplayFault => layout::DISPLAY_FAULT_BIT,
            Fault::BatteryFault => layout::BATTERY_FAULT_BIT,
            Fault::CurrentLimiting => layout::CURRENT_LIMIT_BIT,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Fault::ControllerFault => "controller fault",
            Fault::DisplayFault => "display fault",
            Fault::BatteryFault => "battery fault",
            Fault::CurrentLimiting => "current limiting",
        }
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw status error byte. Bits above 0x08 carry no meaning and are ignored.
///
/// # Examples
/// ```
/// use ridelink_core::protocol::telemetry::{Fault, FaultFlags};
///
/// let flags = FaultFlags(0x05);
/// assert_eq!(flags.faults(), vec![Fault::ControllerFault, Fault::BatteryFault]);
/// assert_eq!(flags.describe(), "controller fault, battery fault");
/// assert_eq!(FaultFlags(0xF0).describe(), "no faults");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaultFlags(pub u8);

impl FaultFlags {
    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, fault: Fault) -> bool {
        self.0 & fault.bit() != 0
    }

    pub fn faults(self) -> Vec<Fault> {
        Fault::ALL
            .into_iter()
            .filter(|fault| self.contains(*fault))
            .collect()
    }

    pub fn is_clear(self) -> bool {
        Fault::ALL.iter().all(|fault| !self.contains(*fault))
    }

    /// Comma-joined fault labels, or [`NO_FAULTS`].
    pub fn describe(self) -> String {
        if self.is_clear() {
            return NO_FAULTS.to_string();
        }
        self.faults()
            .iter()
            .map(|fault| fault.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for FaultFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Fault, FaultFlags, NO_FAULTS};

    #[test]
    fn zero_means_no_faults() {
        assert!(FaultFlags(0).is_clear());
        assert!(FaultFlags(0).faults().is_empty());
        assert_eq!(FaultFlags(0).describe(), NO_FAULTS);
    }

    #[test]
    fn every_known_bit_is_decoded() {
        let flags = FaultFlags(0x0F);
        assert_eq!(flags.faults(), Fault::ALL.to_vec());
        assert_eq!(
            flags.describe(),
            "controller fault, display fault, battery fault, current limiting"
        );
    }

    #[test]
    fn unknown_bits_are_ignored() {
        let flags = FaultFlags(0xA8);
        assert_eq!(flags.faults(), vec![Fault::CurrentLimiting]);
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(FaultFlags(0x0A).to_string(), "0x0A");
    }
}
