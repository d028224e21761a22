//! Serial link protocol decoding.
//!
//! Each layer follows the same structure:
//! - `layout`: byte offsets, ranges and fixed byte values (source of truth)
//! - `reader`: bounds-checked byte access
//! - `parser` / `validator`: domain-level decoding
//! - `error`: explicit, actionable errors
//!
//! `frame` turns the raw byte stream into checksum-verified frames and
//! `telemetry` decodes the payloads of known commands. Neither performs I/O.

pub mod frame;
pub mod telemetry;
