/// 8-bit running sum over the length byte, command byte and payload.
///
/// The sum is taken without overflow and truncated to its low byte.
///
/// # Examples
/// ```
/// use ridelink_core::protocol::frame::checksum;
///
/// assert_eq!(checksum(0x02, 0x02, &[]), 0x04);
/// assert_eq!(checksum(0x11, 0x11, &[0xFF, 0x01]), 0x22);
/// ```
pub fn checksum(length: u8, command: u8, payload: &[u8]) -> u8 {
    let sum = payload
        .iter()
        .fold(length as u32 + command as u32, |acc, &byte| acc + byte as u32);
    (sum & 0xFF) as u8
}

#[cfg(test)]
mod tests {
    use super::checksum;

    #[test]
    fn sums_header_and_payload() {
        assert_eq!(checksum(0x11, 0x11, &[1, 2, 3]), 0x28);
    }

    #[test]
    fn truncates_to_low_byte() {
        let payload = [0xFF; 15];
        let expected = ((0x11u32 * 2 + 0xFF * 15) & 0xFF) as u8;
        assert_eq!(checksum(0x11, 0x11, &payload), expected);
    }

    #[test]
    fn payload_order_does_not_matter() {
        assert_eq!(
            checksum(0x04, 0x04, &[0xAA, 0x55]),
            checksum(0x04, 0x04, &[0x55, 0xAA])
        );
    }

    #[test]
    fn empty_payload_sums_header_only() {
        assert_eq!(checksum(0x80, 0x80, &[]), 0x00);
    }
}
