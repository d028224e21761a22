//! Outbound raw text passthrough.
//!
//! Text typed by an operator is sent to the controller unframed, followed by
//! a newline. There is no command encoding on this path.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutboundError {
    #[error("nothing to send: text is empty")]
    Empty,
}

/// Bytes to write for one line of operator text.
///
/// # Examples
/// ```
/// use ridelink_core::outbound::encode_line;
///
/// assert_eq!(encode_line("AT").unwrap(), b"AT\n".to_vec());
/// assert!(encode_line("").is_err());
/// ```
pub fn encode_line(text: &str) -> Result<Vec<u8>, OutboundError> {
    if text.is_empty() {
        return Err(OutboundError::Empty);
    }
    let mut bytes = Vec::with_capacity(text.len() + 1);
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::{OutboundError, encode_line};

    #[test]
    fn appends_newline_to_utf8_text() {
        assert_eq!(encode_line("速度").unwrap(), "速度\n".as_bytes().to_vec());
    }

    #[test]
    fn whitespace_is_sent_as_is() {
        assert_eq!(encode_line(" ").unwrap(), b" \n".to_vec());
    }

    #[test]
    fn empty_text_is_refused() {
        assert_eq!(encode_line(""), Err(OutboundError::Empty));
    }
}
