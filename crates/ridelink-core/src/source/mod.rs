//! Inbound byte sources.
//!
//! A `ByteSource` stands in for the serial transport: it hands out raw
//! chunks in arrival order and knows nothing about framing. Chunk
//! boundaries carry no meaning to the decoder.

mod file;
mod hex;
mod stream;

pub use file::{CaptureFileSource, CaptureFormat};
pub use hex::{HexDumpSource, parse_hex_line, to_hex_line};
pub use stream::{DEFAULT_CHUNK_SIZE, ReaderSource};

use thiserror::Error;

pub trait ByteSource {
    /// Next chunk of inbound bytes, or `None` once the stream has ended.
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError>;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        (**self).next_chunk()
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex byte '{token}' on line {line}")]
    InvalidHex { line: usize, token: String },
}
