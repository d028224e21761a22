use serde::{Deserialize, Serialize};

use crate::protocol::frame::FrameError;
use crate::protocol::telemetry::{Telemetry, TelemetryError};

/// One observation produced while deframing the inbound stream.
///
/// Integrity problems are reported here rather than as `Err`, so a read loop
/// never has to stop because of bad bytes on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LinkEvent {
    /// A frame passed terminator and checksum checks.
    FrameAccepted { command: u8 },
    TerminatorMismatch { expected: u8, actual: u8 },
    ChecksumMismatch { expected: u8, actual: u8 },
    /// Payload of an accepted frame decoded into telemetry.
    TelemetryDecoded { telemetry: Telemetry },
    /// Payload of an accepted frame could not be decoded.
    DecodeError { command: u8, error: TelemetryError },
    /// A sentinel declared a span above the configured limit.
    FrameTooLarge { declared: usize, limit: usize },
    /// Unresolved bytes were dropped to stay under the buffer limit.
    BufferOverflow { dropped: usize },
}

impl LinkEvent {
    /// True for events that mean bytes on the wire were corrupt or lost.
    pub fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            LinkEvent::TerminatorMismatch { .. }
                | LinkEvent::ChecksumMismatch { .. }
                | LinkEvent::DecodeError { .. }
                | LinkEvent::FrameTooLarge { .. }
                | LinkEvent::BufferOverflow { .. }
        )
    }
}

impl From<FrameError> for LinkEvent {
    fn from(value: FrameError) -> Self {
        match value {
            FrameError::TerminatorMismatch { expected, actual } => {
                LinkEvent::TerminatorMismatch { expected, actual }
            }
            FrameError::ChecksumMismatch { expected, actual } => {
                LinkEvent::ChecksumMismatch { expected, actual }
            }
        }
    }
}
