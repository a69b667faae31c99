//! Incremental update delivery.

use std::sync::Mutex;

use tokio::sync::mpsc;

use super::events::GenerationEvent;

/// Receives the running "so far" text of one request.
pub trait UpdateSink: Send + Sync {
    /// Called with the full text produced so far.
    fn on_update(&self, text: &str);

    /// Called when a tier that already delivered updates failed and a later
    /// tier starts over from an empty text.
    fn on_restart(&self) {}
}

impl<F> UpdateSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_update(&self, text: &str) {
        self(text)
    }
}

/// Forwards updates into the channel behind a generation stream.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<GenerationEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<GenerationEvent>) -> Self {
        Self { tx }
    }
}

impl UpdateSink for ChannelSink {
    fn on_update(&self, text: &str) {
        // The receiver is gone once the stream is dropped; nothing to do then.
        let _ = self.tx.send(GenerationEvent::Update(text.to_string()));
    }

    fn on_restart(&self) {
        let _ = self.tx.send(GenerationEvent::Restarted);
    }
}

#[derive(Debug, Default)]
struct GuardState {
    /// Code points delivered since the last restart.
    delivered: usize,
    last: Option<String>,
}

/// Wraps a caller sink so that, between restarts, delivered frames never
/// shrink and never repeat, and the final frame equals the result.
pub struct MonotonicSink<'a> {
    inner: &'a dyn UpdateSink,
    state: Mutex<GuardState>,
}

impl<'a> MonotonicSink<'a> {
    pub fn new(inner: &'a dyn UpdateSink) -> Self {
        Self {
            inner,
            state: Mutex::new(GuardState::default()),
        }
    }

    /// Whether anything was delivered since the last restart.
    pub fn has_delivered(&self) -> bool {
        self.with_state(|s| s.last.is_some())
    }

    /// Start over if anything was delivered.
    pub fn restart_if_dirty(&self) {
        let dirty = self.with_state(|s| {
            let dirty = s.last.is_some();
            *s = GuardState::default();
            dirty
        });
        if dirty {
            self.inner.on_restart();
        }
    }

    /// Deliver the final text unless it was the last frame delivered.
    pub fn finish(&self, text: &str) {
        let send = self.with_state(|s| {
            if s.last.as_deref() == Some(text) {
                return false;
            }
            s.delivered = text.chars().count();
            s.last = Some(text.to_string());
            true
        });
        if send {
            self.inner.on_update(text);
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut GuardState) -> R) -> R {
        let mut guard = match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl UpdateSink for MonotonicSink<'_> {
    fn on_update(&self, text: &str) {
        let send = self.with_state(|s| {
            let chars = text.chars().count();
            if chars < s.delivered || s.last.as_deref() == Some(text) {
                return false;
            }
            s.delivered = chars;
            s.last = Some(text.to_string());
            true
        });
        if send {
            self.inner.on_update(text);
        }
    }

    fn on_restart(&self) {
        self.restart_if_dirty();
    }
}
