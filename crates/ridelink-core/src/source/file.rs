use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::hex::HexDumpSource;
use super::stream::ReaderSource;
use super::{ByteSource, SourceError};

/// On-disk representation of a recorded byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureFormat {
    /// Bytes exactly as received.
    Raw,
    /// Whitespace-separated hex, one chunk per line.
    Hex,
}

impl CaptureFormat {
    /// `.hex` and `.txt` are hex captures, anything else is raw.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "hex" | "txt" => CaptureFormat::Hex,
            _ => CaptureFormat::Raw,
        }
    }
}

/// A capture file (or device node) opened as a byte source.
pub struct CaptureFileSource {
    inner: CaptureReader,
}

enum CaptureReader {
    Raw(ReaderSource<File>),
    Hex(HexDumpSource<BufReader<File>>),
}

impl CaptureFileSource {
    pub fn open(
        path: &Path,
        format: CaptureFormat,
        chunk_size: usize,
    ) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let inner = match format {
            CaptureFormat::Raw => {
                CaptureReader::Raw(ReaderSource::with_chunk_size(file, chunk_size))
            }
            CaptureFormat::Hex => CaptureReader::Hex(HexDumpSource::new(BufReader::new(file))),
        };
        Ok(Self { inner })
    }
}

impl ByteSource for CaptureFileSource {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        match &mut self.inner {
            CaptureReader::Raw(source) => source.next_chunk(),
            CaptureReader::Hex(source) => source.next_chunk(),
        }
    }
}
