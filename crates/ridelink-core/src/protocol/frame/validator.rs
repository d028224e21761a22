use super::checksum::checksum;
use super::error::FrameError;
use super::layout;
use super::scanner::CandidateFrame;

/// A candidate whose terminator and checksum both check out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidFrame<'a> {
    pub command: u8,
    pub payload: &'a [u8],
}

/// Verify the terminator, then the checksum, of a candidate frame.
///
/// A terminator mismatch is reported before the checksum is looked at.
///
/// # Examples
/// ```
/// use ridelink_core::protocol::frame::{CandidateFrame, validate};
///
/// let bytes = [0xFB, 0x00, 0x04, 0x01, 0x02, 0x0B, 0xFE];
/// let frame = validate(&CandidateFrame::new(0, &bytes)).unwrap();
/// assert_eq!(frame.command, 0x04);
/// assert_eq!(frame.payload, &[0x01, 0x02]);
/// ```
pub fn validate<'a>(frame: &CandidateFrame<'a>) -> Result<ValidFrame<'a>, FrameError> {
    let terminator = frame.terminator();
    if terminator != layout::TERMINATOR {
        return Err(FrameError::TerminatorMismatch {
            expected: layout::TERMINATOR,
            actual: terminator,
        });
    }

    let command = frame.command();
    let payload = frame.payload();
    let calculated = checksum(frame.length(), command, payload);
    let declared = frame.checksum();
    if calculated != declared {
        return Err(FrameError::ChecksumMismatch {
            expected: calculated,
            actual: declared,
        });
    }

    Ok(ValidFrame { command, payload })
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::protocol::frame::{CandidateFrame, FrameError, Resolution};

    #[test]
    fn accepts_well_formed_frame() {
        let bytes = [0xFB, 0x00, 0x02, 0x04, 0xFE];
        let frame = validate(&CandidateFrame::new(0, &bytes)).unwrap();
        assert_eq!(frame.command, 0x02);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn rejects_bad_terminator_with_resync() {
        let bytes = [0xFB, 0x00, 0x02, 0x04, 0x00];
        let err = validate(&CandidateFrame::new(0, &bytes)).unwrap_err();
        assert_eq!(
            err,
            FrameError::TerminatorMismatch {
                expected: 0xFE,
                actual: 0x00,
            }
        );
        assert_eq!(err.resolution(), Resolution::Resync);
    }

    #[test]
    fn rejects_bad_checksum_with_consume() {
        let bytes = [0xFB, 0x00, 0x04, 0x01, 0x02, 0x0C, 0xFE];
        let err = validate(&CandidateFrame::new(0, &bytes)).unwrap_err();
        assert_eq!(
            err,
            FrameError::ChecksumMismatch {
                expected: 0x0B,
                actual: 0x0C,
            }
        );
        assert_eq!(err.resolution(), Resolution::Consume);
    }

    #[test]
    fn terminator_is_checked_before_checksum() {
        let bytes = [0xFB, 0x00, 0x04, 0x01, 0x02, 0x00, 0x00];
        let err = validate(&CandidateFrame::new(0, &bytes)).unwrap_err();
        assert!(matches!(err, FrameError::TerminatorMismatch { .. }));
    }
}
