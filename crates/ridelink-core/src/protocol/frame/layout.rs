/// Byte marking the start of a frame.
pub const SENTINEL: u8 = 0xFB;
/// Byte marking the end of a frame.
pub const TERMINATOR: u8 = 0xFE;
/// Value written to the reserved byte by the fixture encoder.
pub const RESERVED: u8 = 0x00;

/// Bytes needed from the sentinel before the length can be read.
pub const MIN_FRAME_LEN: usize = 5;

pub const SENTINEL_OFFSET: usize = 0;
pub const RESERVED_OFFSET: usize = 1;
pub const LENGTH_OFFSET: usize = 2;
/// The controller reuses the length byte as the command discriminator.
pub const COMMAND_OFFSET: usize = 2;
pub const PAYLOAD_OFFSET: usize = 3;

/// `length` counts command, payload and checksum; the payload is the rest.
pub const LENGTH_OVERHEAD: usize = 2;

/// Span of a frame, sentinel to terminator inclusive, for a length byte.
pub const fn frame_span(length: u8) -> usize {
    LENGTH_OFFSET + length as usize + 1
}

/// Payload byte count declared by a length byte.
pub const fn payload_len(length: u8) -> usize {
    (length as usize).saturating_sub(LENGTH_OVERHEAD)
}

/// Longest span any length byte can declare.
pub const MAX_FRAME_SPAN: usize = frame_span(u8::MAX);
