use serde::{Deserialize, Serialize};

use super::LinkEvent;
use crate::protocol::telemetry::{Telemetry, TelemetryRecord, is_known_command};

/// Running counters over the events of one session.
///
/// `last_telemetry` holds the most recent status report, i.e. what a
/// dashboard would currently show.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub bytes_in: u64,
    pub chunks_in: u64,
    pub frames_accepted: u64,
    pub telemetry_decoded: u64,
    pub unrecognized_commands: u64,
    pub terminator_mismatches: u64,
    pub checksum_mismatches: u64,
    pub decode_errors: u64,
    pub frames_too_large: u64,
    pub buffer_overflows: u64,
    pub bytes_dropped: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_telemetry: Option<TelemetryRecord>,
}

impl SessionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one inbound chunk.
    pub fn record_chunk(&mut self, len: usize) {
        self.chunks_in += 1;
        self.bytes_in += len as u64;
    }

    pub fn observe(&mut self, event: &LinkEvent) {
        match event {
            LinkEvent::FrameAccepted { command } => {
                self.frames_accepted += 1;
                if !is_known_command(*command) {
                    self.unrecognized_commands += 1;
                }
            }
            LinkEvent::TerminatorMismatch { .. } => self.terminator_mismatches += 1,
            LinkEvent::ChecksumMismatch { .. } => self.checksum_mismatches += 1,
            LinkEvent::TelemetryDecoded { telemetry } => {
                self.telemetry_decoded += 1;
                match telemetry {
                    Telemetry::Status(record) => self.last_telemetry = Some(record.clone()),
                }
            }
            LinkEvent::DecodeError { .. } => self.decode_errors += 1,
            LinkEvent::FrameTooLarge { .. } => self.frames_too_large += 1,
            LinkEvent::BufferOverflow { dropped } => {
                self.buffer_overflows += 1;
                self.bytes_dropped += *dropped as u64;
            }
        }
    }

    /// Total of events that signal corrupt or lost bytes.
    pub fn integrity_errors(&self) -> u64 {
        self.terminator_mismatches
            + self.checksum_mismatches
            + self.decode_errors
            + self.frames_too_large
            + self.buffer_overflows
    }
}
