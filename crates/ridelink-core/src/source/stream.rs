use std::io::{ErrorKind, Read};

use super::{ByteSource, SourceError};

/// Default read size; a few status frames at a time.
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// Reads raw bytes from any `Read` (capture file, device node, stdin).
pub struct ReaderSource<R> {
    reader: R,
    chunk_size: usize,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    /// A `chunk_size` of zero is treated as one.
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        let mut chunk = vec![0u8; self.chunk_size];
        loop {
            match self.reader.read(&mut chunk) {
                Ok(0) => return Ok(None),
                Ok(n) => {
                    chunk.truncate(n);
                    return Ok(Some(chunk));
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ByteSource, ReaderSource};
    use std::io::Cursor;

    #[test]
    fn splits_input_into_chunks() {
        let mut source = ReaderSource::with_chunk_size(Cursor::new(vec![1u8, 2, 3, 4, 5]), 2);
        assert_eq!(source.next_chunk().unwrap(), Some(vec![1, 2]));
        assert_eq!(source.next_chunk().unwrap(), Some(vec![3, 4]));
        assert_eq!(source.next_chunk().unwrap(), Some(vec![5]));
        assert_eq!(source.next_chunk().unwrap(), None);
    }

    #[test]
    fn zero_chunk_size_reads_bytewise() {
        let source = ReaderSource::with_chunk_size(Cursor::new(vec![1u8]), 0);
        assert_eq!(source.chunk_size(), 1);
    }
}
