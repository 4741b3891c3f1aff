use bytes::{Buf, BytesMut};
use fdd_types::{CompletedFile, FrameHeader};
use fdd_wire::checksum;

use crate::config::DecoderConfig;
use crate::event::{Anomaly, DecoderEvent, EventSink};
use crate::progress::derive_progress;

/// Where the decoder is within the current frame.
///
/// ```text
///            header parsed
///   Idle ──────────────────────▶ AwaitingPayload(header)
///    ▲                                   │
///    └───────────────────────────────────┘
///      frame complete (file emitted or
///      dropped on checksum mismatch)
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecoderState {
    /// Scanning for a frame start.
    #[default]
    Idle,
    /// Header recognized; the front of the buffer is this frame.
    AwaitingPayload(FrameHeader),
}

/// Outcome of one pass of the decode loop.
enum Step {
    /// Something was consumed or the state changed; run another pass.
    Continue,
    /// Not enough bytes buffered to go further.
    Starved,
}

/// Incremental decoder for the drive's serial byte stream.
///
/// Bytes are pushed in with [`receive`](Self::receive) in whatever chunks
/// the transport delivers them. The decoder buffers them, resynchronizes
/// past noise, and reports each fully received frame as a
/// [`CompletedFile`]. Splitting the input differently never changes the
/// files or diagnostics produced, only how many progress events appear.
///
/// # Example
///
/// ```rust
/// use fdd_decoder::{DecoderEvent, StreamDecoder};
///
/// let frame = [0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x02, 0x00, 0xAA, 0xBB];
/// let mut decoder = StreamDecoder::new();
///
/// let mut files = Vec::new();
/// for byte in frame {
///     for event in decoder.receive(&[byte]) {
///         if let DecoderEvent::File(file) = event {
///             files.push(file);
///         }
///     }
/// }
///
/// assert_eq!(files.len(), 1);
/// assert_eq!(files[0].payload().as_ref(), &[0xAA, 0xBB]);
/// assert_eq!(decoder.buffered_len(), 0);
/// ```
#[derive(Debug)]
pub struct StreamDecoder {
    buffer: BytesMut,
    state: DecoderState,
    config: DecoderConfig,
}

impl StreamDecoder {
    /// Create a decoder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    #[must_use]
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            buffer: BytesMut::with_capacity(config.initial_capacity),
            state: DecoderState::Idle,
            config,
        }
    }

    /// Append `data` and decode as far as possible, collecting the events.
    ///
    /// Convenience wrapper over [`receive_into`](Self::receive_into).
    pub fn receive(&mut self, data: &[u8]) -> Vec<DecoderEvent> {
        let mut events = Vec::new();
        self.receive_into(data, &mut events);
        events
    }

    /// Append `data` and decode as far as possible.
    ///
    /// Events go to `sink` synchronously, in detection order, before this
    /// returns. Never fails: anomalies become [`Anomaly`] diagnostics and
    /// the offending bytes are dropped.
    pub fn receive_into<S: EventSink + ?Sized>(&mut self, data: &[u8], sink: &mut S) {
        self.buffer.extend_from_slice(data);

        loop {
            let step = match self.state {
                DecoderState::Idle => self.scan(sink),
                DecoderState::AwaitingPayload(header) => self.accumulate(header, sink),
            };
            if let Step::Starved = step {
                break;
            }
        }

        tracing::trace!(
            received = data.len(),
            buffered = self.buffer.len(),
            state = ?self.state,
            "waiting for more bytes"
        );
    }

    /// Drop everything buffered and go back to [`DecoderState::Idle`].
    ///
    /// Safe at any point, including mid-frame. No events are emitted.
    pub fn reset(&mut self) {
        if !self.buffer.is_empty() || self.state != DecoderState::Idle {
            tracing::debug!(discarded = self.buffer.len(), "decoder reset");
        }
        self.buffer.clear();
        self.state = DecoderState::Idle;
    }

    #[must_use]
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Number of bytes received but not yet consumed.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Idle: look for a header at the front of the buffer.
    fn scan<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> Step {
        if self.buffer.is_empty() {
            return Step::Starved;
        }

        let parsed = FrameHeader::read_from(&self.buffer).and_then(|header| {
            if self.config.check_program_length {
                if let Some(program) = header.as_program() {
                    program.validate()?;
                }
            }
            Ok(header)
        });

        match parsed {
            Ok(header) => {
                tracing::debug!(
                    file_type = %header.file_type(),
                    payload_len = header.payload_len(),
                    "frame header recognized"
                );
                self.transition(DecoderState::AwaitingPayload(header), sink);
                Step::Continue
            }
            Err(err) => match Anomaly::from_header_error(err) {
                None => Step::Starved,
                Some(anomaly) => {
                    self.skip(anomaly, sink);
                    Step::Continue
                }
            },
        }
    }

    /// AwaitingPayload: wait until the whole frame is buffered, then emit it.
    fn accumulate<S: EventSink + ?Sized>(&mut self, header: FrameHeader, sink: &mut S) -> Step {
        sink.progress(derive_progress(&self.state, self.buffer.len()));

        let frame_size = header.expected_frame_size();
        if self.buffer.len() < frame_size {
            return Step::Starved;
        }

        let raw_frame = self.buffer.split_to(frame_size).freeze();
        let file = CompletedFile::from_frame(header, raw_frame);

        match self.verify_checksum(&file) {
            Ok(()) => {
                tracing::debug!(
                    file_type = %header.file_type(),
                    payload_len = file.payload().len(),
                    "file received"
                );
                sink.completed_file(file);
            }
            Err(anomaly) => {
                tracing::warn!(%anomaly, "frame dropped");
                sink.diagnostic(anomaly);
            }
        }

        self.transition(DecoderState::Idle, sink);
        Step::Continue
    }

    /// With `strict_checksum`, the last payload byte must be the XOR of
    /// the bytes before it.
    fn verify_checksum(&self, file: &CompletedFile) -> Result<(), Anomaly> {
        if !self.config.strict_checksum {
            return Ok(());
        }
        let Some((&stored, body)) = file.payload().split_last() else {
            return Ok(());
        };
        let computed = checksum(body);
        if computed == stored {
            Ok(())
        } else {
            Err(Anomaly::ChecksumMismatch {
                file_type: file.header().file_type(),
                computed,
                stored,
                frame_len: file.raw_frame().len(),
            })
        }
    }

    fn skip<S: EventSink + ?Sized>(&mut self, anomaly: Anomaly, sink: &mut S) {
        let count = anomaly.bytes_skipped().min(self.buffer.len());
        tracing::debug!(%anomaly, skipped = count, "resynchronizing");
        self.buffer.advance(count);
        sink.diagnostic(anomaly);
    }

    /// Every state change re-derives and emits progress.
    fn transition<S: EventSink + ?Sized>(&mut self, next: DecoderState, sink: &mut S) {
        self.state = next;
        sink.progress(derive_progress(&self.state, self.buffer.len()));
    }
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{Progress, ProgressValue};
    use fdd_types::{FileType, ProgramHeader};

    fn program_frame(auto_start_line: u16, program_len: u16, payload: &[u8]) -> Vec<u8> {
        let header = ProgramHeader {
            auto_start_line,
            payload_len: u16::try_from(payload.len()).unwrap(),
            program_len,
        };
        let mut frame = Vec::new();
        header.write_to(&mut frame);
        frame.extend_from_slice(payload);
        frame
    }

    fn files(events: &[DecoderEvent]) -> Vec<&CompletedFile> {
        events
            .iter()
            .filter_map(|event| match event {
                DecoderEvent::File(file) => Some(file),
                _ => None,
            })
            .collect()
    }

    fn diagnostics(events: &[DecoderEvent]) -> Vec<&Anomaly> {
        events
            .iter()
            .filter_map(|event| match event {
                DecoderEvent::Diagnostic(anomaly) => Some(anomaly),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn whole_frame_in_one_call() {
        let frame = program_frame(10, 3, &[1, 2, 3]);
        let mut decoder = StreamDecoder::new();
        let events = decoder.receive(&frame);

        let files = files(&events);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].payload().as_ref(), &[1, 2, 3]);
        assert_eq!(files[0].raw_frame().as_ref(), frame.as_slice());
        assert_eq!(
            files[0].header().as_program().unwrap().auto_start_line,
            10
        );
        assert!(diagnostics(&events).is_empty());
        assert_eq!(decoder.state(), DecoderState::Idle);
        assert_eq!(decoder.buffered_len(), 0);
    }

    #[test]
    fn event_order_for_one_frame() {
        let frame = program_frame(0, 2, &[7, 8]);
        let events = StreamDecoder::new().receive(&frame);

        let receiving = |current| {
            DecoderEvent::Progress(Progress::receiving(FileType::Program, current, 2))
        };
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], receiving(2));
        assert_eq!(events[1], receiving(2));
        assert!(matches!(events[2], DecoderEvent::File(_)));
        assert_eq!(events[3], DecoderEvent::Progress(Progress::indeterminate()));
    }

    #[test]
    fn partial_header_is_starvation() {
        let frame = program_frame(0, 1, &[9]);
        let mut decoder = StreamDecoder::new();

        assert!(decoder.receive(&frame[..7]).is_empty());
        assert_eq!(decoder.state(), DecoderState::Idle);
        assert_eq!(decoder.buffered_len(), 7);

        let events = decoder.receive(&frame[7..]);
        assert_eq!(files(&events).len(), 1);
    }

    #[test]
    fn lone_marker_waits() {
        let mut decoder = StreamDecoder::new();
        assert!(decoder.receive(&[0x00]).is_empty());
        assert_eq!(decoder.buffered(), &[0x00]);
    }

    #[test]
    fn partial_payload_reports_progress() {
        let frame = program_frame(0, 4, &[1, 2, 3, 4]);
        let mut decoder = StreamDecoder::new();
        let events = decoder.receive(&frame[..10]);

        assert!(files(&events).is_empty());
        assert_eq!(
            events.last(),
            Some(&DecoderEvent::Progress(Progress::receiving(
                FileType::Program,
                2,
                4
            )))
        );
        assert!(matches!(decoder.state(), DecoderState::AwaitingPayload(_)));
    }

    #[test]
    fn garbage_byte_skipped_one_at_a_time() {
        let mut input = b"xy".to_vec();
        input.extend(program_frame(0, 0, &[]));
        let events = StreamDecoder::new().receive(&input);

        let diagnostics = diagnostics(&events);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|d| matches!(d, Anomaly::MissingMarker { .. })));
        assert_eq!(files(&events).len(), 1);
    }

    #[test]
    fn invalid_type_skips_two_bytes() {
        let mut input = vec![0x00, 0x05];
        input.extend(program_frame(0, 1, &[0x42]));
        let events = StreamDecoder::new().receive(&input);

        assert_eq!(
            diagnostics(&events),
            vec![&Anomaly::InvalidFileType { code: 0x05 }]
        );
        assert_eq!(files(&events)[0].payload().as_ref(), &[0x42]);
    }

    #[test]
    fn unsupported_type_skips_two_bytes() {
        let mut input = vec![0x00, 0x03];
        input.extend(program_frame(0, 0, &[]));
        let events = StreamDecoder::new().receive(&input);

        assert_eq!(
            diagnostics(&events),
            vec![&Anomaly::UnsupportedFileType {
                file_type: FileType::Bytes
            }]
        );
        assert_eq!(files(&events).len(), 1);
    }

    #[test]
    fn reset_mid_payload_discards_partial_frame() {
        let first = program_frame(0, 4, &[1, 2, 3, 4]);
        let second = program_frame(5, 2, &[5, 6]);
        let mut decoder = StreamDecoder::new();

        decoder.receive(&first[..10]);
        decoder.reset();
        assert_eq!(decoder.state(), DecoderState::Idle);
        assert_eq!(decoder.buffered_len(), 0);

        let events = decoder.receive(&second);
        let files = files(&events);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].raw_frame().as_ref(), second.as_slice());
    }

    #[test]
    fn back_to_back_frames() {
        let mut input = program_frame(1, 1, &[0xAA]);
        input.extend(program_frame(2, 2, &[0xBB, 0xCC]));
        let mut decoder = StreamDecoder::new();
        let events = decoder.receive(&input);

        let files = files(&events);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].payload().as_ref(), &[0xAA]);
        assert_eq!(files[1].payload().as_ref(), &[0xBB, 0xCC]);
        assert_eq!(decoder.buffered_len(), 0);
    }

    #[test]
    fn progress_never_counts_next_frame() {
        let mut input = program_frame(0, 2, &[1, 2]);
        input.extend(program_frame(0, 0, &[]));
        let events = StreamDecoder::new().receive(&input);

        for event in &events {
            if let DecoderEvent::Progress(Progress {
                value: ProgressValue::Value { current, total },
                ..
            }) = event
            {
                assert!(current <= total);
            }
        }
    }

    #[test]
    fn strict_checksum_accepts_valid_payload() {
        let config = DecoderConfig {
            strict_checksum: true,
            ..DecoderConfig::default()
        };
        let payload = [0x12, 0x34, 0x12 ^ 0x34];
        let events = StreamDecoder::with_config(config).receive(&program_frame(0, 3, &payload));
        assert_eq!(files(&events).len(), 1);
    }

    #[test]
    fn strict_checksum_drops_bad_frame() {
        let config = DecoderConfig {
            strict_checksum: true,
            ..DecoderConfig::default()
        };
        let mut decoder = StreamDecoder::with_config(config);
        let events = decoder.receive(&program_frame(0, 3, &[0x12, 0x34, 0x00]));

        assert!(files(&events).is_empty());
        assert_eq!(
            diagnostics(&events),
            vec![&Anomaly::ChecksumMismatch {
                file_type: FileType::Program,
                computed: 0x26,
                stored: 0x00,
                frame_len: 11,
            }]
        );
        assert_eq!(decoder.buffered_len(), 0);
        assert_eq!(decoder.state(), DecoderState::Idle);
    }

    #[test]
    fn program_length_check_is_opt_in() {
        let frame = program_frame(0, 9, &[1, 2]);

        let lenient = StreamDecoder::new().receive(&frame);
        assert_eq!(files(&lenient).len(), 1);

        let config = DecoderConfig {
            check_program_length: true,
            ..DecoderConfig::default()
        };
        let strict = StreamDecoder::with_config(config).receive(&frame);
        assert!(files(&strict).is_empty());
        assert!(matches!(
            diagnostics(&strict).first(),
            Some(Anomaly::MalformedHeader { .. })
        ));
    }
}
