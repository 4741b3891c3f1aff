/// Implementation of `fdd inspect`.
///
/// Decodes a capture without writing anything and prints the event log
/// in detection order.
///
/// # Output format
///
/// ```text
/// diagnostic  Initial byte is not 0, skipping.
/// file 1      Program, 277 bytes (program 242, variables 35), auto start 1
/// file 2      Program, 20 bytes (program 14, variables 6)
/// ---
/// 305 bytes read, 2 files, 1 diagnostic
/// ```
///
/// With `--json` the same log is printed as a JSON document (see
/// [`Report`]).
use anyhow::{Context, Result};
use fdd_decoder::{DecoderEvent, ProgressValue};
use fdd_types::{CompletedFile, ProgramHeader};
use serde::Serialize;

use crate::InspectArgs;
use crate::capture::{self, Capture};
use crate::cmd_decode::plural;

/// Run the `fdd inspect` command.
///
/// # Errors
///
/// Returns an error if the capture cannot be read.
pub async fn run(args: &InspectArgs) -> Result<()> {
    let capture = capture::decode(&args.input, args.decoder.config()).await?;
    let report = Report::from_capture(&capture, args.progress);

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("cannot serialize report")?;
        println!("{json}");
    } else {
        print_text(&report);
    }
    Ok(())
}

// ── Report ────────────────────────────────────────────────────────────────────

/// JSON shape of `fdd inspect --json`.
#[derive(Serialize)]
pub struct Report {
    pub bytes_read: u64,
    pub pending_bytes: usize,
    pub events: Vec<ReportEvent>,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReportEvent {
    Diagnostic {
        message: String,
    },
    Progress {
        description: String,
        file_type: Option<String>,
        current: Option<usize>,
        total: Option<usize>,
        /// Completed fraction in `0.0..=1.0`.
        fraction: Option<f64>,
    },
    File(FileSummary),
}

#[derive(Serialize)]
pub struct FileSummary {
    pub index: usize,
    pub file_type: String,
    pub payload_len: usize,
    pub program_len: Option<u16>,
    pub variables_len: Option<u16>,
    pub auto_start_line: Option<u16>,
}

impl Report {
    fn from_capture(capture: &Capture, with_progress: bool) -> Self {
        let mut index = 0;
        let events = capture
            .events
            .iter()
            .filter_map(|event| match event {
                DecoderEvent::Diagnostic(anomaly) => Some(ReportEvent::Diagnostic {
                    message: anomaly.to_string(),
                }),
                DecoderEvent::Progress(progress) if with_progress => {
                    let (current, total) = match progress.value {
                        ProgressValue::Indeterminate => (None, None),
                        ProgressValue::Value { current, total } => (Some(current), Some(total)),
                    };
                    Some(ReportEvent::Progress {
                        description: progress.description.clone(),
                        file_type: progress.file_type.map(|t| t.to_string()),
                        current,
                        total,
                        fraction: progress.fraction(),
                    })
                }
                DecoderEvent::Progress(_) => None,
                DecoderEvent::File(file) => {
                    index += 1;
                    Some(ReportEvent::File(FileSummary::new(index, file)))
                }
            })
            .collect();

        Self {
            bytes_read: capture.bytes_read,
            pending_bytes: capture.pending,
            events,
        }
    }
}

impl FileSummary {
    fn new(index: usize, file: &CompletedFile) -> Self {
        let program = file.header().as_program();
        Self {
            index,
            file_type: file.header().file_type().to_string(),
            payload_len: file.payload().len(),
            program_len: program.map(|p| p.program_len),
            variables_len: program.map(ProgramHeader::variables_len),
            auto_start_line: program.and_then(|p| p.auto_start()),
        }
    }
}

// ── Text output ───────────────────────────────────────────────────────────────

fn print_text(report: &Report) {
    let mut files = 0;
    let mut diagnostics = 0;

    for event in &report.events {
        match event {
            ReportEvent::Diagnostic { message } => {
                diagnostics += 1;
                println!("diagnostic  {message}");
            }
            ReportEvent::Progress {
                description,
                current,
                total,
                fraction,
                ..
            } => match (current, total, fraction) {
                (Some(current), Some(total), Some(fraction)) => {
                    println!(
                        "progress    {description} {current}/{total} ({:.0}%)",
                        fraction * 100.0
                    );
                }
                _ => println!("progress    {description}"),
            },
            ReportEvent::File(summary) => {
                files += 1;
                println!("{:<11} {}", format!("file {}", summary.index), describe(summary));
            }
        }
    }

    println!("---");
    println!(
        "{} bytes read, {files} file{}, {diagnostics} diagnostic{}",
        report.bytes_read,
        plural(files),
        plural(diagnostics)
    );
    if report.pending_bytes > 0 {
        println!(
            "{} trailing bytes belong to an unfinished frame",
            report.pending_bytes
        );
    }
}

fn describe(summary: &FileSummary) -> String {
    let mut line = format!("{}, {} bytes", summary.file_type, summary.payload_len);
    if let (Some(program_len), Some(variables_len)) = (summary.program_len, summary.variables_len) {
        line.push_str(&format!(" (program {program_len}, variables {variables_len})"));
    }
    if let Some(line_no) = summary.auto_start_line {
        line.push_str(&format!(", auto start {line_no}"));
    }
    line
}
