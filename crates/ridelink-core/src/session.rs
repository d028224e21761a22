use std::fs;
use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::link::{ConfigError, DecoderConfig, LinkDecoder, LinkEvent, SessionSummary};
use crate::source::{
    ByteSource, CaptureFileSource, CaptureFormat, DEFAULT_CHUNK_SIZE, SourceError, to_hex_line,
};
use crate::{InputInfo, SessionReport, make_stub_report};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Invalid decoder config: {0}")]
    Config(#[from] ConfigError),
}

/// How a capture is read and decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub config: DecoderConfig,
    /// Capture format; guessed from the file extension when unset.
    pub format: Option<CaptureFormat>,
    /// Read size for raw captures.
    pub chunk_size: usize,
    /// Keep every event in the report, not just the summary.
    pub record_events: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            config: DecoderConfig::default(),
            format: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            record_events: true,
        }
    }
}

/// Decode a capture file into a report.
pub fn decode_capture_file(
    path: &Path,
    options: &SessionOptions,
) -> Result<SessionReport, SessionError> {
    decode_capture_file_with(path, options, |_| {})
}

/// Decode a capture file, passing every event to `on_event` as it resolves.
pub fn decode_capture_file_with<F>(
    path: &Path,
    options: &SessionOptions,
    on_event: F,
) -> Result<SessionReport, SessionError>
where
    F: FnMut(&LinkEvent),
{
    let format = options
        .format
        .unwrap_or_else(|| CaptureFormat::from_path(path));
    let meta = fs::metadata(path)?;
    let source = CaptureFileSource::open(path, format, options.chunk_size)?;
    let input = InputInfo {
        path: path.display().to_string(),
        bytes: meta.is_file().then(|| meta.len()),
        format,
    };

    let mut report = decode_source(input, source, options, on_event)?;
    if let Some(generated_at) = meta.modified().ok().and_then(format_system_time) {
        report.generated_at = generated_at;
    }
    Ok(report)
}

/// Drive `source` to its end through a fresh decoder.
///
/// Protocol problems never fail the session; only source errors do.
pub fn decode_source<S, F>(
    input: InputInfo,
    mut source: S,
    options: &SessionOptions,
    mut on_event: F,
) -> Result<SessionReport, SessionError>
where
    S: ByteSource,
    F: FnMut(&LinkEvent),
{
    let mut decoder = LinkDecoder::new(options.config)?;
    let mut summary = SessionSummary::new();
    let mut events = Vec::new();

    while let Some(chunk) = source.next_chunk()? {
        log::trace!("received {} bytes: {}", chunk.len(), to_hex_line(&chunk));
        summary.record_chunk(chunk.len());
        for event in decoder.ingest(&chunk) {
            summary.observe(&event);
            on_event(&event);
            if options.record_events {
                events.push(event);
            }
        }
    }
    if decoder.buffered_len() > 0 {
        log::debug!(
            "stream ended with {} unresolved bytes",
            decoder.buffered_len()
        );
    }

    let mut report = make_stub_report(input, options.config);
    report.summary = summary;
    report.unresolved_bytes = decoder.buffered_len() as u64;
    report.events = events;
    Ok(report)
}

fn format_system_time(time: std::time::SystemTime) -> Option<String> {
    OffsetDateTime::from(time).format(&Rfc3339).ok()
}
