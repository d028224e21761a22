//! Ridelink core library: deframing and decoding of a vehicle controller's
//! serial telemetry link.
//!
//! The controller streams sentinel-delimited frames (`FB .. FE`) protected
//! by an 8-bit sum. This crate turns an arbitrarily chunked byte stream into
//! a sequence of [`LinkEvent`]s: accepted frames, decoded telemetry, and
//! integrity diagnostics. Opening the port and rendering values are left to
//! the caller; `source` only adapts files and readers into byte chunks.
//!
//! Invariants:
//! - Output does not depend on how the input was split into chunks.
//! - Every received byte is either framed or explicitly skipped; errors on
//!   the wire are events, never `Err`.
//! - A bad terminator skips only past its sentinel, so a real frame starting
//!   right after a spurious sentinel is still found.
//!
//! # Examples
//! ```
//! use ridelink_core::protocol::frame::encode_frame;
//! use ridelink_core::{LinkDecoder, LinkEvent};
//!
//! let mut payload = [0u8; 15];
//! payload[13] = 42;
//! let frame = encode_frame(0x11, &payload)?;
//!
//! let mut decoder = LinkDecoder::default();
//! let (head, tail) = frame.split_at(7);
//! assert!(decoder.ingest(head).next().is_none());
//! let events: Vec<_> = decoder.ingest(tail).collect();
//! assert_eq!(events[0], LinkEvent::FrameAccepted { command: 0x11 });
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod link;
pub mod outbound;
pub mod protocol;
mod session;
pub mod source;

pub use link::{ConfigError, DecoderConfig, Ingest, LinkDecoder, LinkEvent, SessionSummary};
pub use protocol::telemetry::{Fault, FaultFlags, Telemetry, TelemetryRecord};
pub use session::{
    SessionError, SessionOptions, decode_capture_file, decode_capture_file_with, decode_source,
};
pub use source::{ByteSource, CaptureFileSource, CaptureFormat, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the input has no modification time.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Result of decoding one capture or device session.
///
/// # Examples
/// ```
/// use ridelink_core::{CaptureFormat, DecoderConfig, InputInfo, make_stub_report};
///
/// let input = InputInfo {
///     path: "ride.bin".to_string(),
///     bytes: Some(40),
///     format: CaptureFormat::Raw,
/// };
/// let report = make_stub_report(input, DecoderConfig::default());
/// assert_eq!(report.report_version, ridelink_core::REPORT_VERSION);
/// assert!(report.events.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 timestamp; the input's modification time when known.
    pub generated_at: String,
    pub input: InputInfo,
    /// Decoder settings the session ran with.
    pub config: DecoderConfig,
    pub summary: SessionSummary,
    /// Bytes still buffered when the stream ended.
    pub unresolved_bytes: u64,
    /// Every event in arrival order, when recorded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<LinkEvent>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes; absent for streams such as device nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    pub format: CaptureFormat,
}

/// Build a report with base fields filled and empty results.
pub fn make_stub_report(input: InputInfo, config: DecoderConfig) -> SessionReport {
    SessionReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "ridelink".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input,
        config,
        summary: SessionSummary::default(),
        unresolved_bytes: 0,
        events: vec![],
    }
}
