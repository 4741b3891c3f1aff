#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use fdd_decoder::{DecoderEvent, StreamDecoder};

#[derive(Arbitrary, Debug)]
struct Input {
    data: Vec<u8>,
    splits: Vec<u8>,
}

fn settled(events: Vec<DecoderEvent>) -> Vec<DecoderEvent> {
    events
        .into_iter()
        .filter(|event| !matches!(event, DecoderEvent::Progress(_)))
        .collect()
}

// Fuzz target: chunked delivery must match a single delivery.
//
// `splits` gives the chunk sizes; files and diagnostics must be the same
// as when the whole input is delivered at once.
fuzz_target!(|input: Input| {
    let mut whole = StreamDecoder::new();
    let expected = settled(whole.receive(&input.data));

    let mut chunked = StreamDecoder::new();
    let mut events = Vec::new();
    let mut rest = input.data.as_slice();
    for size in input.splits {
        let (chunk, tail) = rest.split_at(usize::from(size).min(rest.len()));
        events.extend(chunked.receive(chunk));
        rest = tail;
    }
    events.extend(chunked.receive(rest));

    assert_eq!(settled(events), expected);
    assert_eq!(chunked.buffered(), whole.buffered());
    assert_eq!(chunked.state(), whole.state());
});
