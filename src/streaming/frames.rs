//! Record framing over a response byte stream.
//!
//! Proxy tiers speak `text/event-stream`; the SSE line protocol (carry-over
//! across reads, split UTF-8 sequences, CRLF, comments) is handled by
//! `eventsource-stream` and only the `data` payloads surface here. The direct
//! tier sends concatenated JSON objects, framed by [`JsonObjectDecoder`].

use std::pin::Pin;

use eventsource_stream::{EventStreamError, Eventsource};
use futures::{Stream, StreamExt, future};

use super::json_frames::JsonObjectDecoder;
use crate::error::GenerationError;

/// Payload that ends an event stream cleanly.
pub const TERMINATOR: &str = "[DONE]";

/// One framed item of a streaming body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A raw record, normally one JSON object.
    Record(String),
    /// The terminator sentinel was seen.
    Terminator,
}

pub type FrameStream = Pin<Box<dyn Stream<Item = Result<Frame, GenerationError>> + Send>>;

/// Frame a `text/event-stream` body. Empty events are dropped.
pub fn sse_frames<S, B>(body: S) -> FrameStream
where
    S: Stream<Item = Result<B, GenerationError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let frames = body.eventsource().filter_map(|item| {
        let frame = match item {
            Ok(event) => {
                let data = event.data.trim();
                if data.is_empty() {
                    None
                } else if data == TERMINATOR {
                    Some(Ok(Frame::Terminator))
                } else {
                    Some(Ok(Frame::Record(data.to_string())))
                }
            }
            Err(EventStreamError::Transport(e)) => Some(Err(e)),
            Err(e) => Some(Err(GenerationError::MalformedResponse(format!(
                "The event stream could not be decoded ({e})."
            )))),
        };
        future::ready(frame)
    });
    Box::pin(frames)
}

/// Frame a body of concatenated JSON objects (a JSON array or NDJSON).
pub fn json_object_frames<S, B>(body: S) -> FrameStream
where
    S: Stream<Item = Result<B, GenerationError>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut body = Box::pin(body);
        let mut framer = JsonObjectDecoder::new();
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(chunk) => {
                    for record in framer.feed(chunk.as_ref()) {
                        yield Ok(Frame::Record(record));
                    }
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
        for record in framer.finish() {
            yield Ok(Frame::Record(record));
        }
    })
}
