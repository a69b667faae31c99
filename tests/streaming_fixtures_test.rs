//! Recorded stream bodies decoded under arbitrary chunking.

mod support;

use augury::error::GenerationError;
use augury::streaming::StreamDecoder;
use futures::executor::block_on;
use proptest::prelude::*;
use support::fixture;

fn decode(mut decoder: StreamDecoder, body: &[u8], cuts: &[usize]) -> (Vec<String>, String) {
    let mut cuts: Vec<usize> = cuts.iter().map(|c| c % (body.len() + 1)).collect();
    cuts.sort_unstable();
    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts.into_iter().chain(std::iter::once(body.len())) {
        chunks.push(Ok::<_, GenerationError>(body[start..cut].to_vec()));
        start = cut;
    }

    let mut updates = Vec::new();
    block_on(decoder.decode(futures::stream::iter(chunks), |u| {
        updates.push(u.to_string())
    }))
    .unwrap();
    (updates, decoder.into_text())
}

#[test]
fn proxy_text_fixture() {
    let body = fixture("proxy_text_stream.sse");
    let mut decoder = StreamDecoder::proxy_text();
    let mut updates = Vec::new();
    let chunks = vec![Ok::<_, GenerationError>(body.into_bytes())];
    block_on(decoder.decode(futures::stream::iter(chunks), |u| {
        updates.push(u.to_string())
    }))
    .unwrap();
    assert!(decoder.is_completed());
    assert_eq!(decoder.skipped(), 1);
    assert_eq!(updates.len(), 5);
    assert!(decoder.text().ends_with("advises patience."));
}

#[test]
fn proxy_vision_fixture_replaces_with_final_text() {
    let body = fixture("proxy_vision_stream.sse");
    let (updates, text) = decode(StreamDecoder::proxy_vision(), body.as_bytes(), &[]);
    assert_eq!(
        text,
        "The life line is long and unbroken, curving widely around the thumb."
    );
    assert_eq!(updates.last(), Some(&text));
}

#[test]
fn direct_fixture_keeps_braces_inside_strings() {
    let body = fixture("direct_stream.json");
    let (updates, text) = decode(StreamDecoder::direct(), body.as_bytes(), &[]);
    assert_eq!(updates.len(), 3);
    assert_eq!(text, "梦见渡河，象征着{转变}与新的开始。");
}

proptest! {
    #[test]
    fn chunking_does_not_change_results(cuts in proptest::collection::vec(any::<usize>(), 0..12)) {
        for (name, make) in [
            ("proxy_text_stream.sse", StreamDecoder::proxy_text as fn() -> StreamDecoder),
            ("proxy_vision_stream.sse", StreamDecoder::proxy_vision),
            ("direct_stream.json", StreamDecoder::direct),
        ] {
            let body = fixture(name);
            let (_, whole) = decode(make(), body.as_bytes(), &[]);
            let (updates, chunked) = decode(make(), body.as_bytes(), &cuts);
            prop_assert_eq!(&chunked, &whole);
            prop_assert_eq!(updates.last(), Some(&whole));
        }
    }
}
