use std::fs;
use std::io::Cursor;

use ridelink_core::protocol::frame::encode_frame;
use ridelink_core::source::{HexDumpSource, ReaderSource};
use ridelink_core::{
    CaptureFormat, ConfigError, DecoderConfig, InputInfo, LinkEvent, SessionError, SessionOptions,
    SourceError, decode_capture_file, decode_source,
};

fn input(format: CaptureFormat) -> InputInfo {
    InputInfo {
        path: "memory".to_string(),
        bytes: None,
        format,
    }
}

fn status_frame(battery: u8) -> Vec<u8> {
    let mut payload = [0u8; 15];
    payload[13] = battery;
    encode_frame(0x11, &payload).unwrap()
}

#[test]
fn decode_source_reports_every_event_in_order() {
    let mut stream = status_frame(90);
    stream.extend_from_slice(&status_frame(89));
    let source = ReaderSource::with_chunk_size(Cursor::new(stream), 3);

    let mut seen = Vec::new();
    let report = decode_source(
        input(CaptureFormat::Raw),
        source,
        &SessionOptions::default(),
        |event| seen.push(event.clone()),
    )
    .unwrap();

    assert_eq!(report.summary.bytes_in, 40);
    assert_eq!(report.summary.chunks_in, 14);
    assert_eq!(report.summary.frames_accepted, 2);
    assert_eq!(report.summary.telemetry_decoded, 2);
    assert_eq!(
        report.summary.last_telemetry.map(|r| r.battery_percent),
        Some(89)
    );
    assert_eq!(report.events, seen);
    assert_eq!(report.unresolved_bytes, 0);
}

#[test]
fn events_can_be_left_out_of_report() {
    let source = ReaderSource::new(Cursor::new(status_frame(1)));
    let options = SessionOptions {
        record_events: false,
        ..SessionOptions::default()
    };
    let report = decode_source(input(CaptureFormat::Raw), source, &options, |_| {}).unwrap();
    assert!(report.events.is_empty());
    assert_eq!(report.summary.frames_accepted, 1);
}

#[test]
fn hex_source_feeds_decoder() {
    let text = "FB 00 02\n04 FE\n";
    let source = HexDumpSource::new(Cursor::new(text));
    let report = decode_source(
        input(CaptureFormat::Hex),
        source,
        &SessionOptions::default(),
        |_| {},
    )
    .unwrap();
    assert_eq!(report.events, vec![LinkEvent::FrameAccepted { command: 0x02 }]);
    assert_eq!(report.summary.unrecognized_commands, 1);
}

#[test]
fn bad_hex_fails_the_session() {
    let source = HexDumpSource::new(Cursor::new("FB 0G\n"));
    let err = decode_source(
        input(CaptureFormat::Hex),
        source,
        &SessionOptions::default(),
        |_| {},
    )
    .unwrap_err();
    assert!(err.to_string().contains("invalid hex byte"));
}

#[test]
fn limits_are_recorded_in_report() {
    let options = SessionOptions {
        config: DecoderConfig {
            max_frame_len: Some(24),
            max_buffered: Some(64),
        },
        ..SessionOptions::default()
    };
    let source = ReaderSource::new(Cursor::new(vec![0xFB, 0x00, 0xC8, 0x00, 0x00]));
    let report = decode_source(input(CaptureFormat::Raw), source, &options, |_| {}).unwrap();
    assert_eq!(report.summary.frames_too_large, 1);
    assert_eq!(report.config.max_frame_len, Some(24));
    assert_eq!(report.unresolved_bytes, 4);
}

#[test]
fn undersized_buffer_cap_fails_before_reading() {
    let options = SessionOptions {
        config: DecoderConfig {
            max_frame_len: None,
            max_buffered: Some(16),
        },
        ..SessionOptions::default()
    };
    let source = ReaderSource::new(Cursor::new(status_frame(5)));
    let err = decode_source(input(CaptureFormat::Raw), source, &options, |_| {}).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Config(ConfigError::BufferBelowFrameSpan {
            max_buffered: 16,
            required: 258,
        })
    ));
}

#[test]
fn capture_file_format_follows_extension() {
    let dir = std::env::temp_dir().join(format!("ridelink_session_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("capture.hex");
    fs::write(&path, "FB 00 02 04 FE\n").unwrap();

    let report = decode_capture_file(&path, &SessionOptions::default()).unwrap();
    let _ = fs::remove_dir_all(&dir);

    assert_eq!(report.input.format, CaptureFormat::Hex);
    assert_eq!(report.input.bytes, Some(15));
    assert_eq!(report.summary.frames_accepted, 1);
}

#[test]
fn missing_capture_is_an_io_error() {
    let path = std::env::temp_dir().join("ridelink_missing_capture.bin");
    let err = decode_capture_file(&path, &SessionOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Io(_) | SessionError::Source(SourceError::Io(_))
    ));
}
