//! Stream decoding: framing, tier adapter and accumulator in one place.

use futures::{Stream, StreamExt};
use serde_json::Value;

use super::accumulator::TextAccumulator;
use super::frames::{Frame, FrameStream, json_object_frames, sse_frames};
use super::records::{
    DirectCumulativeAdapter, ProxyTextAdapter, ProxyVisionAdapter, RecordAdapter, StreamRecord,
};
use crate::error::GenerationError;

/// How records are delimited on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingKind {
    /// `data:` lines of a `text/event-stream`.
    Sse,
    /// Concatenated JSON objects (NDJSON or a JSON array).
    JsonObjects,
}

/// Decoder for one streaming response.
///
/// Each record moves the accumulated text forward and every change is
/// reported as a snapshot. Malformed records are skipped. An explicit error
/// record aborts with `ServerFault`. After a completion signal or terminator
/// the decoder ignores further input.
pub struct StreamDecoder {
    framing: FramingKind,
    adapter: Box<dyn RecordAdapter>,
    text: TextAccumulator,
    completed: bool,
    skipped: usize,
}

impl std::fmt::Debug for StreamDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamDecoder")
            .field("framing", &self.framing)
            .field("adapter", &self.adapter.name())
            .field("chars", &self.text.len())
            .field("completed", &self.completed)
            .field("skipped", &self.skipped)
            .finish()
    }
}

impl StreamDecoder {
    pub fn new(framing: FramingKind, adapter: Box<dyn RecordAdapter>) -> Self {
        Self {
            framing,
            adapter,
            text: TextAccumulator::new(),
            completed: false,
            skipped: 0,
        }
    }

    /// Proxy text stream: SSE framing with additive `content` deltas.
    pub fn proxy_text() -> Self {
        Self::new(FramingKind::Sse, Box::new(ProxyTextAdapter))
    }

    /// Proxy vision stream: SSE framing with `text`/`finalText` records.
    pub fn proxy_vision() -> Self {
        Self::new(FramingKind::Sse, Box::new(ProxyVisionAdapter))
    }

    /// Direct provider stream: concatenated JSON objects with cumulative text.
    pub fn direct() -> Self {
        Self::new(FramingKind::JsonObjects, Box::new(DirectCumulativeAdapter))
    }

    pub fn framing(&self) -> FramingKind {
        self.framing
    }

    /// Frame a response body the way this decoder expects it.
    pub fn frames<S, B>(&self, body: S) -> FrameStream
    where
        S: Stream<Item = Result<B, GenerationError>> + Send + 'static,
        B: AsRef<[u8]> + Send + 'static,
    {
        match self.framing {
            FramingKind::Sse => sse_frames(body),
            FramingKind::JsonObjects => json_object_frames(body),
        }
    }

    /// Decode a whole body, calling `on_update` with the accumulated text
    /// after every change. Returns once the body ends or completion is seen.
    pub async fn decode<S, B>(
        &mut self,
        body: S,
        mut on_update: impl FnMut(&str),
    ) -> Result<(), GenerationError>
    where
        S: Stream<Item = Result<B, GenerationError>> + Send + 'static,
        B: AsRef<[u8]> + Send + 'static,
    {
        let mut frames = self.frames(body);
        while !self.completed {
            let Some(frame) = frames.next().await else {
                break;
            };
            match frame? {
                Frame::Record(record) => {
                    for update in self.push(&record)? {
                        on_update(&update);
                    }
                }
                Frame::Terminator => self.completed = true,
            }
        }
        Ok(())
    }

    /// Apply one framed record and return the snapshots it produced.
    pub fn push(&mut self, record: &str) -> Result<Vec<String>, GenerationError> {
        let mut updates = Vec::new();
        if self.completed {
            return Ok(updates);
        }
        let record: Value = match serde_json::from_str(record) {
            Ok(v) => v,
            Err(e) => {
                self.skipped += 1;
                tracing::debug!(
                    target: "augury::streaming",
                    adapter = self.adapter.name(),
                    error = %e,
                    "skipping malformed record"
                );
                return Ok(updates);
            }
        };
        for item in self.adapter.interpret(&record) {
            match item {
                StreamRecord::Delta(delta) => {
                    if self.text.apply(delta) {
                        updates.push(self.text.text().to_string());
                    }
                }
                StreamRecord::Completed => {
                    self.completed = true;
                    break;
                }
                StreamRecord::Error(message) => {
                    return Err(GenerationError::server_fault(
                        None,
                        format!("The generation service reported an error: {message}"),
                    ));
                }
            }
        }
        Ok(updates)
    }

    /// Whether a completion signal or terminator was seen.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Number of records dropped as malformed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn text(&self) -> &str {
        self.text.text()
    }

    /// The accumulated text, possibly empty.
    pub fn into_text(self) -> String {
        self.text.into_text()
    }
}
