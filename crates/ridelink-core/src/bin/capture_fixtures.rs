use std::fs;
use std::path::{Path, PathBuf};

use ridelink_core::protocol::frame::encode_frame;
use ridelink_core::protocol::telemetry::layout;
use ridelink_core::source::to_hex_line;

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    write_status_clean(&root.join("status_clean"))?;
    write_noise_resync(&root.join("noise_resync"))?;
    Ok(())
}

/// Two status reports; the first arrives split across two reads.
fn write_status_clean(dir: &Path) -> Result<(), String> {
    let first = status_frame(StatusFields {
        odometer_tenths: 12345,
        total_time: 69136,
        trip_distance_tenths: 1234,
        trip_time: 300,
        remaining_range: 42,
        battery_percent: 87,
        error_flags: 0x0A,
    })?;
    let second = status_frame(StatusFields {
        odometer_tenths: 12346,
        total_time: 69196,
        trip_distance_tenths: 1235,
        trip_time: 360,
        remaining_range: 41,
        battery_percent: 86,
        error_flags: 0x00,
    })?;

    let mut text = String::from("# two status reports, the first split across reads\n");
    for line in [&first[..7], &first[7..], &second[..]] {
        text.push_str(&to_hex_line(line));
        text.push('\n');
    }
    write_file(&dir.join("input.hex"), text.as_bytes())
}

/// Noise, a spurious sentinel, a good report, a corrupted report, an
/// unknown command and a truncated tail.
fn write_noise_resync(dir: &Path) -> Result<(), String> {
    let good = status_frame(StatusFields {
        battery_percent: 42,
        error_flags: 0x05,
        ..StatusFields::default()
    })?;
    let mut corrupted = status_frame(StatusFields {
        battery_percent: 50,
        ..StatusFields::default()
    })?;
    let checksum_index = corrupted.len() - 2;
    corrupted[checksum_index] = corrupted[checksum_index].wrapping_add(1);
    let unknown = encode_frame(0x04, &[0x01, 0x02]).map_err(|err| err.to_string())?;
    let tail = status_frame(StatusFields {
        odometer_tenths: 1,
        total_time: 1,
        trip_distance_tenths: 1,
        trip_time: 1,
        remaining_range: 1,
        battery_percent: 1,
        error_flags: 0,
    })?;

    let mut data = vec![0x00, 0x13, 0x37];
    data.extend_from_slice(&[0xFB, 0x00, 0x02, 0x55, 0x66]);
    data.extend_from_slice(&good);
    data.extend_from_slice(&corrupted);
    data.extend_from_slice(&unknown);
    data.extend_from_slice(&tail[..6]);
    write_file(&dir.join("input.bin"), &data)
}

#[derive(Default)]
struct StatusFields {
    odometer_tenths: u32,
    total_time: u32,
    trip_distance_tenths: u16,
    trip_time: u32,
    remaining_range: u8,
    battery_percent: u8,
    error_flags: u8,
}

fn status_frame(fields: StatusFields) -> Result<Vec<u8>, String> {
    let mut payload = [0u8; layout::STATUS_PAYLOAD_LEN];
    payload[layout::ODOMETER_RANGE].copy_from_slice(&fields.odometer_tenths.to_le_bytes()[..3]);
    payload[layout::TOTAL_TIME_RANGE].copy_from_slice(&fields.total_time.to_le_bytes()[..3]);
    payload[layout::TRIP_DISTANCE_RANGE]
        .copy_from_slice(&fields.trip_distance_tenths.to_le_bytes());
    payload[layout::TRIP_TIME_RANGE].copy_from_slice(&fields.trip_time.to_le_bytes()[..3]);
    payload[layout::REMAINING_RANGE_OFFSET] = fields.remaining_range;
    payload[layout::BATTERY_PERCENT_OFFSET] = fields.battery_percent;
    payload[layout::ERROR_FLAGS_OFFSET] = fields.error_flags;
    encode_frame(layout::STATUS_COMMAND, &payload).map_err(|err| err.to_string())
}

fn write_file(path: &Path, data: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
    }
    fs::write(path, data).map_err(|err| format!("failed to write {}: {}", path.display(), err))
}
