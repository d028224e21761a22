use std::fs;
use std::path::{Path, PathBuf};

use ridelink_core::{SessionOptions, SessionReport, decode_capture_file};

fn golden_dir(dir: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(dir)
}

fn load_expected_report(dir: &str) -> SessionReport {
    let expected_path = golden_dir(dir).join("expected_report.json");
    let expected_json = fs::read_to_string(&expected_path).expect("read expected_report.json");
    serde_json::from_str(&expected_json).expect("parse expected report")
}

fn run_golden(dir: &str, input: &str) {
    let input = golden_dir(dir).join(input);
    let expected = load_expected_report(dir);

    let mut actual =
        decode_capture_file(&input, &SessionOptions::default()).expect("decode capture");
    actual.generated_at = expected.generated_at.clone();
    actual.input.path = expected.input.path.clone();

    let actual_value = serde_json::to_value(actual).expect("serialize actual");
    let expected_value = serde_json::to_value(expected).expect("serialize expected");

    assert_eq!(actual_value, expected_value, "golden mismatch in {dir}");
}

#[test]
fn golden_status_clean() {
    run_golden("tests/golden/status_clean", "input.hex");
}

#[test]
fn golden_noise_resync() {
    run_golden("tests/golden/noise_resync", "input.bin");
}

#[test]
fn golden_reports_match_serializer_output() {
    for dir in ["tests/golden/status_clean", "tests/golden/noise_resync"] {
        let path = golden_dir(dir).join("expected_report.json");
        let on_disk = fs::read_to_string(&path).expect("read expected_report.json");
        let rewritten = serde_json::to_string(&load_expected_report(dir)).expect("serialize");
        assert_eq!(on_disk, rewritten, "{dir} was not written by regenerate_golden");
    }
}

#[test]
fn golden_status_clean_keeps_latest_values() {
    let report = load_expected_report("tests/golden/status_clean");
    let last = report.summary.last_telemetry.expect("last telemetry");
    assert_eq!(last.odometer_tenths, 12346);
    assert_eq!(last.battery_percent, 86);
    assert!(last.faults.is_empty());
}

#[test]
fn golden_noise_resync_leaves_partial_frame_buffered() {
    let report = load_expected_report("tests/golden/noise_resync");
    assert_eq!(report.unresolved_bytes, 6);
    assert_eq!(report.summary.terminator_mismatches, 1);
    assert_eq!(report.summary.checksum_mismatches, 1);
    assert_eq!(report.summary.unrecognized_commands, 1);
}
