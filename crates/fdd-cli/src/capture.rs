/// Reading a recorded serial capture through the stream decoder.
use std::path::Path;

use anyhow::{Context, Result};
use fdd_decoder::{Anomaly, DecoderConfig, DecoderEvent, StreamDecoder, drain};
use fdd_types::CompletedFile;

/// Everything the decoder reported for one capture.
pub struct Capture {
    pub events: Vec<DecoderEvent>,
    pub bytes_read: u64,
    /// Bytes of an unfinished frame left in the decoder at end of input.
    pub pending: usize,
}

impl Capture {
    pub fn files(&self) -> impl Iterator<Item = &CompletedFile> {
        self.events.iter().filter_map(|event| match event {
            DecoderEvent::File(file) => Some(file),
            _ => None,
        })
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Anomaly> {
        self.events.iter().filter_map(|event| match event {
            DecoderEvent::Diagnostic(anomaly) => Some(anomaly),
            _ => None,
        })
    }
}

/// Decode the capture at `input`, or stdin when `input` is `-`.
///
/// # Errors
///
/// Returns an error if the capture cannot be opened or read.
pub async fn decode(input: &Path, config: DecoderConfig) -> Result<Capture> {
    let mut decoder = StreamDecoder::with_config(config);
    let mut events = Vec::new();

    let bytes_read = if input == Path::new("-") {
        let mut stdin = tokio::io::stdin();
        drain(&mut stdin, &mut decoder, &mut events)
            .await
            .context("cannot read capture from stdin")?
    } else {
        let mut file = tokio::fs::File::open(input)
            .await
            .with_context(|| format!("cannot open {}", input.display()))?;
        drain(&mut file, &mut decoder, &mut events)
            .await
            .with_context(|| format!("cannot read {}", input.display()))?
    };

    let pending = decoder.buffered_len();
    if pending > 0 {
        tracing::warn!(pending, "capture ends inside a frame, trailing bytes ignored");
    }

    Ok(Capture {
        events,
        bytes_read,
        pending,
    })
}
