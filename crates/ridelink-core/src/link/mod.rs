//! Streaming link decoder.
//!
//! `LinkDecoder` owns the frame scanner and drives each candidate through
//! validation and telemetry decoding. Bytes are pushed in with
//! [`LinkDecoder::ingest`], which hands back a lazy iterator of
//! [`LinkEvent`]s. Every call resolves as many frames as the buffered bytes
//! allow and then stops; nothing blocks and nothing is retried.
//!
//! Per accepted frame the order is `FrameAccepted`, then `TelemetryDecoded`
//! or `DecodeError` when the command has a decoder.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::frame::layout::{MAX_FRAME_SPAN, MIN_FRAME_LEN};
use crate::protocol::frame::{
    CandidateFrame, FrameScanner, Resolution, Scan, ScanLimits, validate,
};
use crate::protocol::telemetry::decode;

mod event;
pub mod summary;

pub use event::LinkEvent;
pub use summary::SessionSummary;

/// Decoder settings. The defaults reproduce the controller tool exactly:
/// no frame size limit and no buffer cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Reject sentinels declaring a span longer than this many bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_frame_len: Option<usize>,
    /// Drop the oldest unresolved bytes beyond this many.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_buffered: Option<usize>,
}

/// A `DecoderConfig` the decoder cannot honor.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_buffered ({max_buffered}) is below the largest frame span ({required})")]
    BufferBelowFrameSpan { max_buffered: usize, required: usize },
}

impl DecoderConfig {
    /// Longest span a frame may have before it is resolved.
    ///
    /// A partial frame is always shorter than this, so a buffer cap of at
    /// least this size never has to cut into one.
    pub fn largest_span(&self) -> usize {
        self.max_frame_len
            .map_or(MAX_FRAME_SPAN, |limit| limit.min(MAX_FRAME_SPAN))
            .max(MIN_FRAME_LEN)
    }

    /// Check that `max_buffered`, when set, can hold the largest frame.
    ///
    /// # Examples
    /// ```
    /// use ridelink_core::DecoderConfig;
    ///
    /// let tight = DecoderConfig { max_frame_len: Some(24), max_buffered: Some(16) };
    /// assert!(tight.validate().is_err());
    ///
    /// let ok = DecoderConfig { max_frame_len: Some(24), max_buffered: Some(24) };
    /// assert!(ok.validate().is_ok());
    /// assert!(DecoderConfig::default().validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = self.largest_span();
        match self.max_buffered {
            Some(max_buffered) if max_buffered < required => {
                Err(ConfigError::BufferBelowFrameSpan {
                    max_buffered,
                    required,
                })
            }
            _ => Ok(()),
        }
    }

    fn scan_limits(&self) -> ScanLimits {
        ScanLimits {
            max_frame_len: self.max_frame_len,
            max_buffered: self.max_buffered,
        }
    }
}

/// Deframes and decodes one inbound byte stream.
#[derive(Debug, Default)]
pub struct LinkDecoder {
    scanner: FrameScanner,
    config: DecoderConfig,
    pending: VecDeque<LinkEvent>,
}

/// Bytes to drop once a candidate has been dealt with.
enum Cut {
    Resync(usize),
    Consume(usize),
}

impl LinkDecoder {
    /// Build a decoder, rejecting a buffer cap smaller than a frame.
    pub fn new(config: DecoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            scanner: FrameScanner::with_limits(config.scan_limits()),
            config,
            pending: VecDeque::new(),
        })
    }

    pub fn config(&self) -> DecoderConfig {
        self.config
    }

    /// Append `bytes` and return the events they make resolvable.
    ///
    /// The returned iterator is lazy: frames are only validated as it is
    /// advanced. Dropping it early leaves the remaining bytes, and any event
    /// already resolved but not yet yielded, for the next call.
    ///
    /// # Examples
    /// ```
    /// use ridelink_core::{LinkDecoder, LinkEvent};
    ///
    /// let mut decoder = LinkDecoder::default();
    /// let events: Vec<_> = decoder.ingest(&[0xFB, 0x00, 0x02, 0x04]).collect();
    /// assert!(events.is_empty());
    ///
    /// let events: Vec<_> = decoder.ingest(&[0xFE]).collect();
    /// assert_eq!(events, vec![LinkEvent::FrameAccepted { command: 0x02 }]);
    /// ```
    pub fn ingest(&mut self, bytes: &[u8]) -> Ingest<'_> {
        self.scanner.extend(bytes);
        Ingest { decoder: self }
    }

    /// Eager form of [`LinkDecoder::ingest`].
    pub fn ingest_all(&mut self, bytes: &[u8]) -> Vec<LinkEvent> {
        self.ingest(bytes).collect()
    }

    /// Number of bytes received but not yet framed or skipped.
    pub fn buffered_len(&self) -> usize {
        self.scanner.len()
    }

    pub fn buffered(&self) -> &[u8] {
        self.scanner.buffered()
    }

    /// Discard buffered bytes, e.g. when the device reconnects.
    pub fn reset(&mut self) {
        self.scanner.reset();
        self.pending.clear();
    }

    /// Resolve at most one candidate. Returns false when more bytes are
    /// needed.
    fn step(&mut self) -> bool {
        let out = &mut self.pending;
        let cut = match self.scanner.next_candidate() {
            Scan::NeedMore => None,
            Scan::TooLarge {
                start,
                declared,
                limit,
            } => {
                log::debug!("sentinel at {start} declares {declared} bytes (limit {limit})");
                out.push_back(LinkEvent::FrameTooLarge { declared, limit });
                Some(Cut::Resync(start))
            }
            Scan::Candidate(frame) => Some(resolve(&frame, out)),
        };

        match cut {
            Some(Cut::Resync(start)) => {
                self.scanner.resync(start);
                true
            }
            Some(Cut::Consume(end)) => {
                self.scanner.consume(end);
                true
            }
            None => {
                if let Some(dropped) = self.scanner.enforce_buffer_limit() {
                    log::warn!("buffer limit reached, dropped {dropped} bytes");
                    out.push_back(LinkEvent::BufferOverflow { dropped });
                }
                false
            }
        }
    }
}

fn resolve(frame: &CandidateFrame<'_>, out: &mut VecDeque<LinkEvent>) -> Cut {
    let valid = match validate(frame) {
        Ok(valid) => valid,
        Err(err) => {
            log::debug!("{err} (frame at {})", frame.start());
            let cut = match err.resolution() {
                Resolution::Resync => Cut::Resync(frame.start()),
                Resolution::Consume => Cut::Consume(frame.end()),
            };
            out.push_back(err.into());
            return cut;
        }
    };

    log::trace!(
        "frame accepted: command 0x{:02X}, {} payload bytes",
        valid.command,
        valid.payload.len()
    );
    out.push_back(LinkEvent::FrameAccepted {
        command: valid.command,
    });
    match decode(valid.command, valid.payload) {
        Some(Ok(telemetry)) => out.push_back(LinkEvent::TelemetryDecoded { telemetry }),
        Some(Err(error)) => {
            log::debug!("command 0x{:02X}: {error}", valid.command);
            out.push_back(LinkEvent::DecodeError {
                command: valid.command,
                error,
            });
        }
        None => {}
    }
    Cut::Consume(frame.end())
}

/// Lazy event sequence returned by [`LinkDecoder::ingest`].
pub struct Ingest<'a> {
    decoder: &'a mut LinkDecoder,
}

impl Iterator for Ingest<'_> {
    type Item = LinkEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.decoder.pending.pop_front() {
                return Some(event);
            }
            if !self.decoder.step() {
                return self.decoder.pending.pop_front();
            }
        }
    }
}
