use bytes::{Buf, BytesMut};
use super::layout;

const INITIAL_CAPACITY: usize = 1024;

/// Optional bounds on what the scanner will hold or wait for.
///
/// Both are unset by default: the scanner then waits indefinitely for the
/// span a length byte declares and never drops unresolved bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanLimits {
    /// Largest accepted span, sentinel to terminator inclusive.
    pub max_frame_len: Option<usize>,
    /// Largest number of unresolved bytes kept between calls.
    pub max_buffered: Option<usize>,
}

/// A complete span `[start, end)` of the buffer that starts with a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateFrame<'a> {
    start: usize,
    bytes: &'a [u8],
}

impl<'a> CandidateFrame<'a> {
    pub fn new(start: usize, bytes: &'a [u8]) -> Self {
        Self { start, bytes }
    }

    /// Buffer index of the sentinel byte.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Buffer index one past the terminator byte.
    pub fn end(&self) -> usize {
        self.start + self.bytes.len()
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn length(&self) -> u8 {
        self.byte_at(layout::LENGTH_OFFSET)
    }

    pub fn command(&self) -> u8 {
        self.byte_at(layout::COMMAND_OFFSET)
    }

    pub fn terminator(&self) -> u8 {
        self.bytes.last().copied().unwrap_or_default()
    }

    /// Declared checksum, the byte before the terminator.
    pub fn checksum(&self) -> u8 {
        self.bytes
            .len()
            .checked_sub(2)
            .map(|index| self.byte_at(index))
            .unwrap_or_default()
    }

    /// Bytes strictly between the command and the checksum.
    pub fn payload(&self) -> &'a [u8] {
        let end = layout::PAYLOAD_OFFSET + layout::payload_len(self.length());
        self.bytes
            .get(layout::PAYLOAD_OFFSET..end)
            .unwrap_or_default()
    }

    fn byte_at(&self, offset: usize) -> u8 {
        self.bytes.get(offset).copied().unwrap_or_default()
    }
}

/// Outcome of one search over the buffered bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan<'a> {
    /// No frame can be determined yet.
    NeedMore,
    /// A sentinel whose declared span is fully buffered.
    Candidate(CandidateFrame<'a>),
    /// A sentinel declaring a span above `max_frame_len`.
    TooLarge {
        start: usize,
        declared: usize,
        limit: usize,
    },
}

/// Accumulates inbound bytes and slices candidate frames out of them.
///
/// The scanner never drops bytes on its own while searching; the caller
/// resolves each candidate with [`FrameScanner::consume`] or
/// [`FrameScanner::resync`].
#[derive(Debug)]
pub struct FrameScanner {
    buffer: BytesMut,
    limits: ScanLimits,
}

impl Default for FrameScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScanner {
    pub fn new() -> Self {
        Self::with_limits(ScanLimits::default())
    }

    pub fn with_limits(limits: ScanLimits) -> Self {
        Self {
            buffer: BytesMut::with_capacity(INITIAL_CAPACITY),
            limits,
        }
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Locate the first sentinel and check whether its span is complete.
    pub fn next_candidate(&self) -> Scan<'_> {
        let Some(start) = self
            .buffer
            .iter()
            .position(|&byte| byte == layout::SENTINEL)
        else {
            return Scan::NeedMore;
        };
        if self.buffer.len() - start < layout::MIN_FRAME_LEN {
            return Scan::NeedMore;
        }

        let length = self.buffer[start + layout::LENGTH_OFFSET];
        let span = layout::frame_span(length);
        if let Some(limit) = self.limits.max_frame_len {
            if span > limit {
                return Scan::TooLarge {
                    start,
                    declared: span,
                    limit,
                };
            }
        }

        let end = start + span;
        if self.buffer.len() < end {
            return Scan::NeedMore;
        }
        Scan::Candidate(CandidateFrame::new(start, &self.buffer[start..end]))
    }

    /// Drop everything up to and including the sentinel at `start`.
    pub fn resync(&mut self, start: usize) {
        self.drop_front(start + 1);
    }

    /// Drop everything before `end`, the end of a resolved candidate.
    pub fn consume(&mut self, end: usize) {
        self.drop_front(end);
    }

    /// Trim the oldest bytes when `max_buffered` is exceeded.
    ///
    /// Only bytes ahead of the first sentinel are dropped; a frame that is
    /// still arriving is never cut. Returns the number of bytes dropped.
    pub fn enforce_buffer_limit(&mut self) -> Option<usize> {
        let limit = self.limits.max_buffered?;
        let excess = self.buffer.len().checked_sub(limit)?;
        let pending = self
            .buffer
            .iter()
            .position(|&byte| byte == layout::SENTINEL)
            .unwrap_or(self.buffer.len());
        let dropped = excess.min(pending);
        if dropped == 0 {
            return None;
        }
        self.buffer.advance(dropped);
        Some(dropped)
    }

    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Forget all buffered bytes, e.g. after the device reconnects.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    fn drop_front(&mut self, count: usize) {
        let count = count.min(self.buffer.len());
        self.buffer.advance(count);
    }
}
