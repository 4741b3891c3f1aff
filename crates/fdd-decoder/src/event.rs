use fdd_types::{CompletedFile, FileType, TypeError};
use fdd_wire::WireError;
use fdd_wire::marker::PREFIX_SIZE;

use crate::progress::Progress;

/// Anomalies the decoder recovers from on its own.
///
/// None of these stop decoding. Each one is reported once, the offending
/// bytes are dropped, and the scan continues with whatever follows. The
/// `Display` output is the human-readable diagnostic shown to users.
///
/// ```text
/// ┌─────────────────────┬─────────────┬────────────────────────────────────┐
/// │ Variant             │ Bytes drop  │ Cause                              │
/// ├─────────────────────┼─────────────┼────────────────────────────────────┤
/// │ MissingMarker       │ 1           │ byte 0 is not 0x00                 │
/// │ InvalidFileType     │ 2           │ byte 1 is not a known type code    │
/// │ UnsupportedFileType │ 2           │ arrays / bytes (not parsed)        │
/// │ MalformedHeader     │ 2           │ program_len > payload_len (opt-in) │
/// │ ChecksumMismatch    │ whole frame │ opt-in payload checksum failed     │
/// └─────────────────────┴─────────────┴────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Anomaly {
    #[error("Initial byte is not 0, skipping.")]
    MissingMarker { found: u8 },

    #[error("Invalid file type, skipping first two bytes.")]
    InvalidFileType { code: u8 },

    #[error("Unsupported file type {file_type}, skipping first two bytes.")]
    UnsupportedFileType { file_type: FileType },

    #[error("Malformed header ({reason}), skipping first two bytes.")]
    MalformedHeader { reason: TypeError },

    #[error(
        "Checksum mismatch in {file_type} payload (computed {computed:#04X}, stored {stored:#04X}), dropping {frame_len} bytes."
    )]
    ChecksumMismatch {
        file_type: FileType,
        computed: u8,
        stored: u8,
        frame_len: usize,
    },
}

impl Anomaly {
    /// Classify a header parse failure.
    ///
    /// Returns `None` when the buffer is merely short: that is starvation,
    /// not an anomaly, and nothing may be dropped.
    #[must_use]
    pub fn from_header_error(err: TypeError) -> Option<Self> {
        match err {
            TypeError::Wire(WireError::UnexpectedEof { .. }) => None,
            TypeError::Wire(WireError::MissingMarker { found }) => {
                Some(Self::MissingMarker { found })
            }
            TypeError::UnknownFileType { code } => Some(Self::InvalidFileType { code }),
            TypeError::UnsupportedFileType { file_type } => {
                Some(Self::UnsupportedFileType { file_type })
            }
            reason @ TypeError::ProgramLengthExceedsPayload { .. } => {
                Some(Self::MalformedHeader { reason })
            }
            // Only CompletedFile::parse raises this; the decoder sizes each
            // frame from its header and never sees a mismatch.
            reason @ TypeError::FrameLengthMismatch { .. } => Some(Self::MalformedHeader { reason }),
        }
    }

    /// Number of buffered bytes discarded because of this anomaly.
    #[must_use]
    pub fn bytes_skipped(&self) -> usize {
        match self {
            Self::MissingMarker { .. } => 1,
            Self::InvalidFileType { .. }
            | Self::UnsupportedFileType { .. }
            | Self::MalformedHeader { .. } => PREFIX_SIZE,
            Self::ChecksumMismatch { frame_len, .. } => *frame_len,
        }
    }
}

/// Everything the decoder reports, in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecoderEvent {
    /// A recovered anomaly.
    Diagnostic(Anomaly),

    /// Progress of the file currently being received.
    Progress(Progress),

    /// A fully received file.
    File(CompletedFile),
}

/// Receiver for decoder events.
///
/// Called synchronously from inside
/// [`StreamDecoder::receive_into`](crate::StreamDecoder::receive_into), in
/// the exact order the decoder detects things. Implementations must not assume they are called at
/// all for a given delivery: a starved decoder emits nothing.
pub trait EventSink {
    fn diagnostic(&mut self, anomaly: Anomaly);
    fn progress(&mut self, progress: Progress);
    fn completed_file(&mut self, file: CompletedFile);
}

impl EventSink for Vec<DecoderEvent> {
    fn diagnostic(&mut self, anomaly: Anomaly) {
        self.push(DecoderEvent::Diagnostic(anomaly));
    }

    fn progress(&mut self, progress: Progress) {
        self.push(DecoderEvent::Progress(progress));
    }

    fn completed_file(&mut self, file: CompletedFile) {
        self.push(DecoderEvent::File(file));
    }
}

/// Adapts a closure taking [`DecoderEvent`] into an [`EventSink`].
///
/// ```rust
/// use fdd_decoder::{DecoderEvent, FnSink, StreamDecoder};
///
/// let mut files = 0;
/// let mut decoder = StreamDecoder::new();
/// decoder.receive_into(&[0x00, 0x00, 0, 0, 0, 0, 0, 0], &mut FnSink(|event: DecoderEvent| {
///     if let DecoderEvent::File(_) = event {
///         files += 1;
///     }
/// }));
/// assert_eq!(files, 1);
/// ```
pub struct FnSink<F>(pub F);

impl<F: FnMut(DecoderEvent)> EventSink for FnSink<F> {
    fn diagnostic(&mut self, anomaly: Anomaly) {
        (self.0)(DecoderEvent::Diagnostic(anomaly));
    }

    fn progress(&mut self, progress: Progress) {
        (self.0)(DecoderEvent::Progress(progress));
    }

    fn completed_file(&mut self, file: CompletedFile) {
        (self.0)(DecoderEvent::File(file));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_drive_log_wording() {
        assert_eq!(
            Anomaly::MissingMarker { found: b'G' }.to_string(),
            "Initial byte is not 0, skipping."
        );
        assert_eq!(
            Anomaly::InvalidFileType { code: 5 }.to_string(),
            "Invalid file type, skipping first two bytes."
        );
        assert_eq!(
            Anomaly::UnsupportedFileType {
                file_type: FileType::NumericArray
            }
            .to_string(),
            "Unsupported file type Numeric Array, skipping first two bytes."
        );
    }

    #[test]
    fn short_buffer_is_not_an_anomaly() {
        let err = TypeError::Wire(WireError::UnexpectedEof { offset: 1 });
        assert_eq!(Anomaly::from_header_error(err), None);
    }

    #[test]
    fn classification_and_skip_counts() {
        let cases = [
            (TypeError::Wire(WireError::MissingMarker { found: 7 }), 1),
            (TypeError::UnknownFileType { code: 9 }, 2),
            (
                TypeError::UnsupportedFileType {
                    file_type: FileType::Bytes,
                },
                2,
            ),
            (
                TypeError::ProgramLengthExceedsPayload {
                    program_len: 3,
                    payload_len: 2,
                },
                2,
            ),
        ];
        for (err, skipped) in cases {
            let anomaly = Anomaly::from_header_error(err).unwrap();
            assert_eq!(anomaly.bytes_skipped(), skipped, "{anomaly:?}");
        }
    }

    #[test]
    fn archived_frame_mismatch_keeps_its_reason() {
        let reason = TypeError::FrameLengthMismatch {
            expected: 10,
            actual: 12,
        };
        assert_eq!(
            Anomaly::from_header_error(reason.clone()),
            Some(Anomaly::MalformedHeader { reason })
        );
    }

    #[test]
    fn malformed_header_mentions_reason() {
        let anomaly = Anomaly::MalformedHeader {
            reason: TypeError::ProgramLengthExceedsPayload {
                program_len: 30,
                payload_len: 20,
            },
        };
        assert_eq!(
            anomaly.to_string(),
            "Malformed header (program length 30 exceeds payload length 20), skipping first two bytes."
        );
    }
}
