//! Telemetry payload decoding.
//!
//! Only the status report (command `0x11`) is defined. Its 15-byte payload
//! packs little-endian fields of mixed width; offsets live in `layout` and
//! the fault bit meanings in `faults`. Unknown commands are not errors:
//! `decode` returns `None` for them.

pub mod error;
pub mod faults;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::TelemetryError;
pub use faults::{Fault, FaultFlags, NO_FAULTS};
pub use layout::STATUS_COMMAND;
pub use parser::{Telemetry, TelemetryRecord, decode, is_known_command, parse_status};
