use super::checksum::checksum;
use super::error::EncodeError;
use super::layout;

/// Build a frame the way the controller emits it.
///
/// The length byte doubles as the command, so `payload` must hold exactly
/// `command - 2` bytes. Used to synthesize captures for tests and fixtures.
///
/// # Examples
/// ```
/// use ridelink_core::protocol::frame::encode_frame;
///
/// let frame = encode_frame(0x04, &[0x01, 0x02]).unwrap();
/// assert_eq!(frame, vec![0xFB, 0x00, 0x04, 0x01, 0x02, 0x0B, 0xFE]);
/// ```
///
/// # Errors
/// Returns `EncodeError::PayloadLengthMismatch` when the payload size does
/// not match the command.
pub fn encode_frame(command: u8, payload: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let needed = layout::payload_len(command);
    if (command as usize) < layout::LENGTH_OVERHEAD || payload.len() != needed {
        return Err(EncodeError::PayloadLengthMismatch {
            command,
            needed,
            actual: payload.len(),
        });
    }

    let span = layout::frame_span(command);
    let payload_end = layout::PAYLOAD_OFFSET + needed;
    let mut frame = vec![0u8; span];
    frame[layout::SENTINEL_OFFSET] = layout::SENTINEL;
    frame[layout::RESERVED_OFFSET] = layout::RESERVED;
    frame[layout::LENGTH_OFFSET] = command;
    frame[layout::PAYLOAD_OFFSET..payload_end].copy_from_slice(payload);
    frame[payload_end] = checksum(command, command, payload);
    frame[span - 1] = layout::TERMINATOR;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::encode_frame;
    use crate::protocol::frame::EncodeError;
    use crate::protocol::frame::layout;

    #[test]
    fn encodes_status_sized_frame() {
        let payload = [0u8; 15];
        let frame = encode_frame(0x11, &payload).unwrap();
        assert_eq!(frame.len(), 20);
        assert_eq!(frame[2], 0x11);
        assert_eq!(frame[18], 0x22);
        assert_eq!(frame[19], 0xFE);
    }

    #[test]
    fn places_fields_at_layout_offsets() {
        let frame = encode_frame(0x03, &[0xAB]).unwrap();
        assert_eq!(frame[layout::SENTINEL_OFFSET], layout::SENTINEL);
        assert_eq!(frame[layout::RESERVED_OFFSET], layout::RESERVED);
        assert_eq!(frame[layout::LENGTH_OFFSET], 0x03);
        assert_eq!(frame[layout::PAYLOAD_OFFSET], 0xAB);
        assert_eq!(frame[4], 0x03 + 0x03 + 0xAB);
        assert_eq!(frame.len(), layout::frame_span(0x03));
    }

    #[test]
    fn rejects_payload_not_matching_command() {
        let err = encode_frame(0x11, &[0u8; 3]).unwrap_err();
        assert_eq!(
            err,
            EncodeError::PayloadLengthMismatch {
                command: 0x11,
                needed: 15,
                actual: 3,
            }
        );
    }

    #[test]
    fn rejects_command_below_overhead() {
        assert!(encode_frame(0x01, &[]).is_err());
    }
}
