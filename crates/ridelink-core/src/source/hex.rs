use std::io::BufRead;

use super::{ByteSource, SourceError};

/// Reads a text capture of hex bytes, one received chunk per line.
///
/// Tokens are whitespace separated, may carry a `0x` prefix and may pack
/// several bytes (`FB0011`). Anything after `#` is a comment.
pub struct HexDumpSource<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> HexDumpSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: 0 }
    }
}

impl<R: BufRead> ByteSource for HexDumpSource<R> {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        let mut text = String::new();
        loop {
            text.clear();
            if self.reader.read_line(&mut text)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let bytes = parse_hex_line(&text, self.line)?;
            if !bytes.is_empty() {
                return Ok(Some(bytes));
            }
        }
    }
}

/// Parse one line of a hex capture. `line` is only used for error reports.
///
/// # Examples
/// ```
/// use ridelink_core::source::parse_hex_line;
///
/// let bytes = parse_hex_line("FB 00 0x11 aabb  # status", 1).unwrap();
/// assert_eq!(bytes, vec![0xFB, 0x00, 0x11, 0xAA, 0xBB]);
/// ```
pub fn parse_hex_line(text: &str, line: usize) -> Result<Vec<u8>, SourceError> {
    let content = text.split('#').next().unwrap_or_default();
    let mut bytes = Vec::new();
    for token in content.split_whitespace() {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        let invalid = || SourceError::InvalidHex {
            line,
            token: token.to_string(),
        };
        if digits.is_empty()
            || digits.len() % 2 != 0
            || !digits.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(invalid());
        }
        for pair in digits.as_bytes().chunks(2) {
            let pair = std::str::from_utf8(pair).map_err(|_| invalid())?;
            bytes.push(u8::from_str_radix(pair, 16).map_err(|_| invalid())?);
        }
    }
    Ok(bytes)
}

/// Render bytes the way hex captures store them: `FB 00 11`.
pub fn to_hex_line(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
