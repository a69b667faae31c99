//! Simulated streaming for whole-body results.

use std::time::Duration;

use super::sink::UpdateSink;
use crate::defaults;

/// Replays a finished text as growing prefixes at a fixed cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Typewriter {
    chunk_size: usize,
    interval: Duration,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(defaults::typewriter::CHUNK_SIZE, defaults::typewriter::INTERVAL)
    }
}

impl Typewriter {
    /// A chunk size of zero is treated as one.
    pub fn new(chunk_size: usize, interval: Duration) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            interval,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Byte offsets at which frames end. The last offset is always `text.len()`.
    pub fn frame_ends(&self, text: &str) -> Vec<usize> {
        let mut ends: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .skip(self.chunk_size)
            .step_by(self.chunk_size)
            .collect();
        ends.push(text.len());
        ends
    }

    /// The frames `play` would deliver.
    pub fn frames(&self, text: &str) -> Vec<String> {
        self.frame_ends(text)
            .into_iter()
            .map(|end| text[..end].to_string())
            .collect()
    }

    /// Deliver every frame to `sink`, pausing between frames. Completes only
    /// after the full text has been delivered.
    pub async fn play(&self, text: &str, sink: &dyn UpdateSink) {
        let ends = self.frame_ends(text);
        tracing::trace!(
            target: "augury::streaming",
            frames = ends.len(),
            chunk_size = self.chunk_size,
            "simulating stream"
        );
        for (i, end) in ends.into_iter().enumerate() {
            if i > 0 && !self.interval.is_zero() {
                tokio::time::sleep(self.interval).await;
            }
            sink.on_update(&text[..end]);
        }
    }
}
