#![no_main]

use libfuzzer_sys::fuzz_target;
use fdd_decoder::{DecoderConfig, DecoderEvent, StreamDecoder};

// Fuzz target: one delivery of arbitrary bytes, both checking modes.
//
// Every input byte must end up either skipped by a diagnostic, inside a
// completed frame, or still buffered.
fuzz_target!(|data: &[u8]| {
    for strict in [false, true] {
        let mut decoder = StreamDecoder::with_config(DecoderConfig {
            strict_checksum: strict,
            check_program_length: strict,
            ..DecoderConfig::default()
        });
        let events = decoder.receive(data);

        let consumed: usize = events
            .iter()
            .map(|event| match event {
                DecoderEvent::Diagnostic(anomaly) => anomaly.bytes_skipped(),
                DecoderEvent::File(file) => file.raw_frame().len(),
                DecoderEvent::Progress(_) => 0,
            })
            .sum();
        assert_eq!(consumed + decoder.buffered_len(), data.len());
    }
});
