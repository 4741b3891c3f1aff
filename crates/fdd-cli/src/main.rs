/// FDD command-line tool: decode captured drive transfers, inspect them,
/// and produce and check `.tap` images.
///
/// # Command overview
///
/// ```text
/// fdd <COMMAND> [OPTIONS]
///
/// Commands:
///   decode     Decode a capture and archive every file as .tap + .data
///   inspect    List the files and diagnostics found in a capture
///   convert    Re-encode one archived raw frame (.data) as a .tap image
///   verify     Check the blocks and checksums of a .tap image
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log decoder activity (debug level) to stderr
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// A capture is the raw byte stream recorded from the drive's serial
/// line, read from a file or from stdin when the path is `-`.
///
/// # Exit codes
///
/// | Code | Meaning                                 |
/// |------|-----------------------------------------|
/// | 0    | Success                                 |
/// | 1    | Error (I/O failure, invalid image, etc.) |
///
/// Logs and errors go to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use fdd_decoder::DecoderConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod archive;
mod capture;
mod cmd_convert;
mod cmd_decode;
mod cmd_inspect;
mod cmd_verify;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Tools for files received from an FDD tape/disk drive.
#[derive(Parser)]
#[command(name = "fdd", version, about = "FDD drive transfer decoder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder activity at debug level (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Decode a capture and archive every file as .tap + .data.
    Decode(DecodeArgs),
    /// List the files and diagnostics found in a capture.
    Inspect(InspectArgs),
    /// Re-encode one archived raw frame as a .tap image.
    Convert(ConvertArgs),
    /// Check the blocks and checksums of a .tap image.
    Verify(VerifyArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Decoder switches shared by every command that reads a capture.
///
/// ```text
/// ┌────────────────────────┬───────────────────────────────────────────────┐
/// │ Flag                   │ Effect                                        │
/// ├────────────────────────┼───────────────────────────────────────────────┤
/// │ --strict-checksum      │ Drop frames whose last payload byte is not    │
/// │                        │ the XOR of the others                         │
/// │ --check-program-length │ Skip headers with program length > payload    │
/// │ --chunk-size N         │ Bytes per read from the capture (default 256) │
/// └────────────────────────┴───────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct DecoderArgs {
    /// Treat the last payload byte as an XOR checksum and drop mismatches.
    #[arg(long)]
    pub strict_checksum: bool,

    /// Reject Program headers whose program length exceeds the payload.
    #[arg(long)]
    pub check_program_length: bool,

    /// Bytes read from the capture per decoder delivery.
    #[arg(long, default_value_t = 256, value_parser = clap::value_parser!(u16).range(1..))]
    pub chunk_size: u16,
}

impl DecoderArgs {
    pub fn config(&self) -> DecoderConfig {
        DecoderConfig {
            strict_checksum: self.strict_checksum,
            check_program_length: self.check_program_length,
            read_chunk_size: usize::from(self.chunk_size),
            ..DecoderConfig::default()
        }
    }
}

/// Arguments for `fdd decode`.
///
/// Every received file is written twice under the output directory:
///
/// ```text
/// <DIR>/Tapes/<name>.tap        tape image for emulators
/// <DIR>/Originals/<name>.data   the raw frame exactly as received
/// ```
///
/// Files are named "File", "File 2", "File 3", … unless `--names` is
/// given. Names must be unique.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Capture file, or `-` for stdin.
    pub input: PathBuf,

    /// Output directory (created if missing).
    #[arg(short, long)]
    pub output: PathBuf,

    /// Comma-separated names, one per received file, in order.
    #[arg(long, value_delimiter = ',')]
    pub names: Option<Vec<String>>,

    #[command(flatten)]
    pub decoder: DecoderArgs,
}

/// Arguments for `fdd inspect`.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Capture file, or `-` for stdin.
    pub input: PathBuf,

    /// Print the event log as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Include progress events in the log.
    #[arg(long)]
    pub progress: bool,

    #[command(flatten)]
    pub decoder: DecoderArgs,
}

/// Arguments for `fdd convert`.
#[derive(clap::Args)]
pub struct ConvertArgs {
    /// A raw frame as archived by `fdd decode` (`Originals/*.data`).
    pub input: PathBuf,

    /// Output `.tap` path.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Name stored in the tape header (defaults to the input file stem).
    #[arg(long)]
    pub name: Option<String>,
}

/// Arguments for `fdd verify`.
#[derive(clap::Args)]
pub struct VerifyArgs {
    /// Path to the `.tap` image.
    pub file: PathBuf,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode::run(&args).await,
        Commands::Inspect(args) => cmd_inspect::run(&args).await,
        Commands::Convert(args) => cmd_convert::run(&args),
        Commands::Verify(args) => cmd_verify::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Stderr logging; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
