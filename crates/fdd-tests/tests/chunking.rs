//! Property tests: how the input is split must not change what is decoded.

use fdd_decoder::{Anomaly, DecoderEvent, Progress, ProgressValue, StreamDecoder};
use fdd_tests::*;
use proptest::prelude::*;

/// Arbitrary bytes interleaved with well-formed frames.
fn capture() -> impl Strategy<Value = Vec<u8>> {
    let chunk = prop_oneof![
        prop::collection::vec(any::<u8>(), 0..24),
        prop::collection::vec(any::<u8>(), 0..64)
            .prop_map(|payload| program_frame(0, 0, &payload)),
        Just(number()),
    ];
    prop::collection::vec(chunk, 0..6).prop_map(|parts| parts.concat())
}

fn split_sizes() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..40, 0..30)
}

proptest! {
    #[test]
    fn split_points_do_not_matter(input in capture(), sizes in split_sizes()) {
        let mut whole = StreamDecoder::new();
        let expected = whole.receive(&input);

        let mut chunked = StreamDecoder::new();
        let actual = decode_chunked(&mut chunked, &input, &sizes);

        prop_assert_eq!(without_progress(&actual), without_progress(&expected));
        prop_assert_eq!(chunked.buffered(), whole.buffered());
        prop_assert_eq!(chunked.state(), whole.state());
    }

    #[test]
    fn progress_stays_within_declared_length(input in capture(), sizes in split_sizes()) {
        let events = decode_chunked(&mut StreamDecoder::new(), &input, &sizes);
        for event in &events {
            if let DecoderEvent::Progress(Progress { value: ProgressValue::Value { current, total }, .. }) = event {
                prop_assert!(current <= total);
            }
        }
    }

    #[test]
    fn every_byte_is_accounted_for(input in capture()) {
        let mut decoder = StreamDecoder::new();
        let events = decoder.receive(&input);

        let consumed: usize = events
            .iter()
            .map(|event| match event {
                DecoderEvent::Diagnostic(anomaly) => anomaly.bytes_skipped(),
                DecoderEvent::File(file) => file.raw_frame().len(),
                DecoderEvent::Progress(_) => 0,
            })
            .sum();
        prop_assert_eq!(consumed + decoder.buffered_len(), input.len());
    }

    #[test]
    fn non_marker_garbage_is_skipped_byte_by_byte(
        garbage in prop::collection::vec(1u8..=255, 0..50),
    ) {
        let mut input = garbage.clone();
        input.extend(number());
        let events = decode_whole(&input);

        let expected: Vec<Anomaly> = garbage
            .iter()
            .map(|&found| Anomaly::MissingMarker { found })
            .collect();
        prop_assert_eq!(diagnostics(&events), expected);
        prop_assert_eq!(files(&events).len(), 1);
    }
}
