use thiserror::Error;

/// Integrity failures detected on a candidate frame.
///
/// # Examples
/// ```
/// use ridelink_core::protocol::frame::{FrameError, Resolution};
///
/// let err = FrameError::TerminatorMismatch { expected: 0xFE, actual: 0x00 };
/// assert_eq!(err.resolution(), Resolution::Resync);
/// assert!(err.to_string().contains("terminator mismatch"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("terminator mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    TerminatorMismatch { expected: u8, actual: u8 },
    #[error("checksum mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },
}

/// How the scanner should drop bytes once a candidate is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Skip past the sentinel only and search again.
    Resync,
    /// Drop the whole candidate span.
    Consume,
}

impl FrameError {
    pub fn resolution(&self) -> Resolution {
        match self {
            FrameError::TerminatorMismatch { .. } => Resolution::Resync,
            FrameError::ChecksumMismatch { .. } => Resolution::Consume,
        }
    }
}

/// Errors returned when building a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("payload of {actual} bytes does not fit command 0x{command:02X} (needs {needed})")]
    PayloadLengthMismatch {
        command: u8,
        needed: usize,
        actual: usize,
    },
}
