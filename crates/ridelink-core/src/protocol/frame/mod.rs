//! Sentinel-delimited frame extraction and integrity checks.
//!
//! Wire format, one frame:
//!
//! ```text
//! FB  rr  LL  payload (LL - 2 bytes)  CS  FE
//! ```
//!
//! `LL` both sizes the frame and selects the command. `CS` is the low byte
//! of `LL + LL + sum(payload)`. The scanner only slices spans out of the
//! buffer; the validator decides whether the scanner skips the whole span
//! or only the sentinel (see [`Resolution`]).

pub mod checksum;
pub mod encode;
pub mod error;
pub mod layout;
pub mod scanner;
pub mod validator;

pub use checksum::checksum;
pub use encode::encode_frame;
pub use error::{EncodeError, FrameError, Resolution};
pub use scanner::{CandidateFrame, FrameScanner, Scan, ScanLimits};
pub use validator::{ValidFrame, validate};
