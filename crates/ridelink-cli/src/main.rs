use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glob::glob;
use log::LevelFilter;
use ridelink_core::outbound::encode_line;
use ridelink_core::source::DEFAULT_CHUNK_SIZE;
use ridelink_core::{
    CaptureFormat, ConfigError, DecoderConfig, LinkEvent, SessionError, SessionOptions,
    SessionReport, SourceError, Telemetry, decode_capture_file_with,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("RIDELINK_BUILD_COMMIT_FULL"),
    "\nbuild date: ",
    env!("RIDELINK_BUILD_DATE"),
);

#[derive(Parser, Debug)]
#[command(name = "ridelink")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Deframe and decode telemetry captured from a vehicle controller's serial link.",
    long_about = None,
    after_help = "Examples:\n  ridelink decode ride.bin -o report.json\n  ridelink decode ride.hex --stdout --pretty\n  ridelink send /dev/ttyUSB0 'AT'"
)]
struct Cli {
    /// Log decoder internals to stderr (-v warn, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a recorded byte stream and generate a JSON session report.
    #[command(
        after_help = "Examples:\n  ridelink decode ride.bin -o report.json\n  ridelink decode 'captures/*.hex' --stdout --no-events"
    )]
    Decode(DecodeArgs),
    /// Write one line of raw text to an already configured device.
    Send {
        /// Device node or file to write to
        device: PathBuf,

        /// Text to send; a newline is appended
        text: String,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Capture file, device node, or a glob matching exactly one file
    input: PathBuf,

    /// Capture format (default: from extension, .hex/.txt are hex)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Bytes per read for raw captures
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = parse_chunk_size)]
    chunk_size: usize,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if any integrity error was seen
    #[arg(long)]
    strict: bool,

    /// Leave the per-event list out of the report
    #[arg(long)]
    no_events: bool,

    /// Reject frames declaring a span longer than this many bytes
    #[arg(long)]
    max_frame_len: Option<usize>,

    /// Drop unframed bytes beyond this many (at least the largest frame span)
    #[arg(long)]
    max_buffered: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Raw,
    Hex,
}

impl From<FormatArg> for CaptureFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Raw => CaptureFormat::Raw,
            FormatArg::Hex => CaptureFormat::Hex,
        }
    }
}

fn parse_chunk_size(value: &str) -> Result<usize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("'{value}' is not a byte count"))?;
    if size == 0 {
        return Err("chunk size must be at least 1".to_string());
    }
    Ok(size)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode(args),
        Commands::Send {
            device,
            text,
            quiet,
        } => cmd_send(&device, &text, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Off,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn cmd_decode(args: DecodeArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&args.input)?;
    validate_input_file(&resolved_input)?;
    let report_path = if args.stdout {
        None
    } else {
        let path = args.report.clone().ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_distinct_output(&resolved_input, &path)?;
        Some(path)
    };

    let options = SessionOptions {
        config: DecoderConfig {
            max_frame_len: args.max_frame_len,
            max_buffered: args.max_buffered,
        },
        format: args.format.map(CaptureFormat::from),
        chunk_size: args.chunk_size,
        record_events: !args.no_events,
    };
    options.config.validate().map_err(|err| match err {
        ConfigError::BufferBelowFrameSpan { required, .. } => CliError::new(
            format!("invalid decoder limits: {err}"),
            Some(format!(
                "use --max-buffered {required} or more, or lower --max-frame-len"
            )),
        ),
    })?;
    let quiet = args.quiet;
    let rep = decode_capture_file_with(&resolved_input, &options, |event| {
        if !quiet {
            eprintln!("{}", render_event(event));
        }
    })
    .map_err(|err| decode_failure(&resolved_input, err))?;
    let json = serialize_report(&rep, args.pretty, args.compact)?;

    match report_path {
        None => print!("{}", json),
        Some(report) => {
            if let Some(parent) = report.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(&report, json)
                .with_context(|| format!("Failed to write report: {}", report.display()))?;
            if !quiet {
                eprintln!("OK: report written -> {}", report.display());
            }
        }
    }

    let summary = &rep.summary;
    if !quiet {
        eprintln!(
            "Summary: {} frames accepted, {} telemetry decoded, {} integrity errors, \
             {} bytes unresolved",
            summary.frames_accepted,
            summary.telemetry_decoded,
            summary.integrity_errors(),
            rep.unresolved_bytes
        );
    }
    if args.strict && summary.integrity_errors() > 0 {
        return Err(CliError::new(
            format!("{} integrity errors detected", summary.integrity_errors()),
            Some("rerun without --quiet to see each event".to_string()),
        ));
    }
    Ok(())
}

fn cmd_send(device: &Path, text: &str, quiet: bool) -> Result<(), CliError> {
    let bytes = encode_line(text).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("pass the text to send as the second argument".to_string()),
        )
    })?;
    if !device.exists() {
        return Err(CliError::new(
            format!("device not found: {}", device.display()),
            Some("configure the port first and pass its device node".to_string()),
        ));
    }

    let mut port = OpenOptions::new()
        .append(true)
        .open(device)
        .with_context(|| format!("Failed to open device: {}", device.display()))?;
    port.write_all(&bytes)
        .and_then(|()| port.flush())
        .with_context(|| format!("Failed to write to device: {}", device.display()))?;

    if !quiet {
        eprintln!("OK: sent {} bytes -> {}", bytes.len(), device.display());
    }
    Ok(())
}

fn decode_failure(input: &Path, err: SessionError) -> CliError {
    let hint = match &err {
        SessionError::Source(SourceError::InvalidHex { .. }) => Some(
            "hex captures hold whitespace-separated byte pairs; use --format raw for binary input",
        ),
        _ => None,
    };
    CliError::new(
        format!("failed to decode {}: {}", input.display(), err),
        hint.map(str::to_string),
    )
}

fn render_event(event: &LinkEvent) -> String {
    match event {
        LinkEvent::FrameAccepted { command } => {
            format!("OK frame accepted (CMD: 0x{command:02X})")
        }
        LinkEvent::TerminatorMismatch { expected, actual } => {
            format!("WARN terminator mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")
        }
        LinkEvent::ChecksumMismatch { expected, actual } => {
            format!("WARN checksum mismatch: calculated 0x{expected:02X}, received 0x{actual:02X}")
        }
        LinkEvent::TelemetryDecoded { telemetry } => render_telemetry(telemetry),
        LinkEvent::DecodeError { command, error } => {
            format!("WARN command 0x{command:02X}: {error}")
        }
        LinkEvent::FrameTooLarge { declared, limit } => {
            format!("WARN frame too large: {declared} bytes declared, limit {limit}")
        }
        LinkEvent::BufferOverflow { dropped } => {
            format!("WARN buffer full: dropped {dropped} bytes")
        }
    }
}

fn render_telemetry(telemetry: &Telemetry) -> String {
    match telemetry {
        Telemetry::Status(record) => format!(
            "status: odometer {:.1}, total time {}, trip distance {:.1}, trip time {}, \
             remaining range {}, battery {}%, flags {} ({})",
            record.odometer,
            record.total_time,
            record.trip_distance,
            record.trip_time,
            record.remaining_range,
            record.battery_percent,
            record.error_flags,
            record.fault_summary()
        ),
        other => format!("telemetry for command 0x{:02X}", other.command()),
    }
}

fn serialize_report(rep: &SessionReport, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn ensure_distinct_output(input: &Path, report_path: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let report_dir = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::canonicalize(parent),
        _ => fs::canonicalize("."),
    };
    // A missing output directory is created later, so it cannot hold the input.
    let Ok(report_dir) = report_dir else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path: {}", report_path.display()))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a raw (.bin) or hex (.hex) capture, or a device node".to_string()),
        ));
    }
    if input.is_dir() {
        return Err(CliError::new(
            format!("input is a directory: {}", input.display()),
            Some("pass a single capture file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single capture file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
