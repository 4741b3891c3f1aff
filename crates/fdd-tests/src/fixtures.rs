use std::fmt::Write as _;

use fdd_decoder::{Anomaly, DecoderEvent, ProgressValue, StreamDecoder};
use fdd_types::{CompletedFile, ProgramHeader};

/// Header of the "redalert" transfer as captured from the drive.
pub const RED_ALERT_HEADER_HEX: &str = "000001001501f200";

/// Header bytes of the "redalert" transfer.
///
/// Auto start line 1, 0x0115 payload bytes, 0x00F2 of them program.
#[must_use]
pub fn red_alert_header() -> Vec<u8> {
    hex::decode(RED_ALERT_HEADER_HEX).expect("fixture hex is valid")
}

/// A Program frame: header followed by `payload`.
///
/// # Panics
///
/// If `payload` is longer than a 16-bit length allows.
#[must_use]
pub fn program_frame(auto_start_line: u16, program_len: u16, payload: &[u8]) -> Vec<u8> {
    let header = ProgramHeader {
        auto_start_line,
        payload_len: u16::try_from(payload.len()).expect("payload fits in u16"),
        program_len,
    };
    let mut frame = Vec::with_capacity(8 + payload.len());
    header.write_to(&mut frame);
    frame.extend_from_slice(payload);
    frame
}

/// `len` bytes of filler that never starts with the frame marker.
#[must_use]
pub fn filler(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| {
            #[allow(clippy::cast_possible_truncation)]
            let b = (i as u8).wrapping_mul(31).wrapping_add(seed);
            b | 0x01
        })
        .collect()
}

/// The "redalert" program: auto start 1, 0x115 payload bytes, 0xF2 program.
#[must_use]
pub fn red_alert() -> Vec<u8> {
    program_frame(1, 0xF2, &filler(0x115, 0x11))
}

/// The "number" program: no auto start, 0x14 payload bytes, 0x0E program.
#[must_use]
pub fn number() -> Vec<u8> {
    program_frame(0, 0x0E, &filler(0x14, 0x42))
}

/// Append the XOR of `body` as a trailing checksum byte.
#[must_use]
pub fn with_checksum(body: &[u8]) -> Vec<u8> {
    let mut payload = body.to_vec();
    payload.push(fdd_wire::checksum(body));
    payload
}

// ── Feeding ───────────────────────────────────────────────────────────────────

/// Feed `input` in one delivery.
#[must_use]
pub fn decode_whole(input: &[u8]) -> Vec<DecoderEvent> {
    StreamDecoder::new().receive(input)
}

/// Feed `input` one byte per delivery.
#[must_use]
pub fn decode_bytewise(input: &[u8]) -> Vec<DecoderEvent> {
    let mut decoder = StreamDecoder::new();
    input
        .iter()
        .flat_map(|&b| decoder.receive(&[b]))
        .collect()
}

/// Feed `input` in deliveries of the given sizes, the last one taking
/// whatever remains. Sizes of 0 produce empty deliveries.
#[must_use]
pub fn decode_chunked(decoder: &mut StreamDecoder, input: &[u8], sizes: &[usize]) -> Vec<DecoderEvent> {
    let mut events = Vec::new();
    let mut rest = input;
    for &size in sizes {
        let (chunk, tail) = rest.split_at(size.min(rest.len()));
        events.extend(decoder.receive(chunk));
        rest = tail;
    }
    events.extend(decoder.receive(rest));
    events
}

// ── Event filters ─────────────────────────────────────────────────────────────

#[must_use]
pub fn files(events: &[DecoderEvent]) -> Vec<CompletedFile> {
    events
        .iter()
        .filter_map(|event| match event {
            DecoderEvent::File(file) => Some(file.clone()),
            _ => None,
        })
        .collect()
}

#[must_use]
pub fn diagnostics(events: &[DecoderEvent]) -> Vec<Anomaly> {
    events
        .iter()
        .filter_map(|event| match event {
            DecoderEvent::Diagnostic(anomaly) => Some(anomaly.clone()),
            _ => None,
        })
        .collect()
}

/// Files and diagnostics in order; progress dropped.
///
/// This is the part of the event log that must not depend on how the
/// input was split.
#[must_use]
pub fn without_progress(events: &[DecoderEvent]) -> Vec<DecoderEvent> {
    events
        .iter()
        .filter(|event| !matches!(event, DecoderEvent::Progress(_)))
        .cloned()
        .collect()
}

/// One line per event, for snapshot tests.
#[must_use]
pub fn render_log(events: &[DecoderEvent]) -> String {
    let mut out = String::new();
    for event in events {
        match event {
            DecoderEvent::Diagnostic(anomaly) => {
                let _ = writeln!(out, "diagnostic  {anomaly}");
            }
            DecoderEvent::Progress(progress) => match progress.value {
                ProgressValue::Indeterminate => {
                    let _ = writeln!(out, "progress    {}", progress.description);
                }
                ProgressValue::Value { current, total } => {
                    let _ = writeln!(out, "progress    {} {current}/{total}", progress.description);
                }
            },
            DecoderEvent::File(file) => {
                let header = file.header();
                let _ = write!(out, "file        {} payload={}", header.file_type(), file.payload().len());
                if let Some(program) = header.as_program() {
                    let _ = write!(out, " program={}", program.program_len);
                    match program.auto_start() {
                        Some(line) => {
                            let _ = write!(out, " auto_start={line}");
                        }
                        None => out.push_str(" auto_start=-"),
                    }
                }
                out.push('\n');
            }
        }
    }
    out
}
