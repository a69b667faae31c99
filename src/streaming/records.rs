//! Tier-specific interpretation of decoded stream records.
//!
//! Every tier reduces its records to the same small vocabulary: a text
//! [`Delta`], a completion signal or an error. The proxy text stream sends
//! additive `content` deltas, the vision stream mixes additive `text` with a
//! corrective `finalText`, and the direct provider stream repeats the
//! cumulative text in every record.

use serde_json::Value;

use crate::error::error_record_message;

/// A change to the accumulated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delta {
    Append(String),
    Replace(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamRecord {
    Delta(Delta),
    Completed,
    Error(String),
}

/// Maps one parsed JSON record to zero or more [`StreamRecord`]s, in the
/// order they must be applied. Unknown shapes map to nothing.
pub trait RecordAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    fn interpret(&self, record: &Value) -> Vec<StreamRecord>;
}

/// `/api/gemini/stream`: `{content}`, `{done: true}`, `{error}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyTextAdapter;

impl RecordAdapter for ProxyTextAdapter {
    fn name(&self) -> &'static str {
        "proxy-text"
    }

    fn interpret(&self, record: &Value) -> Vec<StreamRecord> {
        if let Some(message) = error_record_message(record) {
            return vec![StreamRecord::Error(message)];
        }
        let mut out = Vec::new();
        if let Some(content) = record.get("content").and_then(Value::as_str) {
            out.push(StreamRecord::Delta(Delta::Append(content.to_string())));
        }
        if record.get("done").and_then(Value::as_bool) == Some(true) {
            out.push(StreamRecord::Completed);
        }
        out
    }
}

/// `/api/gemini/vision-stream`: `{text}`, `{finalText}`, `{finishReason}` or
/// `{status: "completed"}`, `{error}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyVisionAdapter;

impl RecordAdapter for ProxyVisionAdapter {
    fn name(&self) -> &'static str {
        "proxy-vision"
    }

    fn interpret(&self, record: &Value) -> Vec<StreamRecord> {
        if let Some(message) = error_record_message(record) {
            return vec![StreamRecord::Error(message)];
        }
        let mut out = Vec::new();
        if let Some(text) = record.get("text").and_then(Value::as_str) {
            out.push(StreamRecord::Delta(Delta::Append(text.to_string())));
        }
        if let Some(text) = record.get("finalText").and_then(Value::as_str) {
            out.push(StreamRecord::Delta(Delta::Replace(text.to_string())));
        }
        let finished = record
            .get("finishReason")
            .is_some_and(|r| !r.is_null())
            || record.get("status").and_then(Value::as_str) == Some("completed");
        if finished {
            out.push(StreamRecord::Completed);
        }
        out
    }
}

/// `:streamGenerateContent`: each record carries the cumulative text of the
/// first candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectCumulativeAdapter;

impl RecordAdapter for DirectCumulativeAdapter {
    fn name(&self) -> &'static str {
        "direct-cumulative"
    }

    fn interpret(&self, record: &Value) -> Vec<StreamRecord> {
        if let Some(message) = error_record_message(record) {
            return vec![StreamRecord::Error(message)];
        }
        let parts = record
            .get("candidates")
            .and_then(Value::as_array)
            .and_then(|c| c.first())
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(Value::as_array);
        let Some(parts) = parts else {
            return Vec::new();
        };
        let mut text = String::new();
        let mut saw_text = false;
        for part in parts {
            if part.get("thought").and_then(Value::as_bool) == Some(true) {
                continue;
            }
            if let Some(t) = part.get("text").and_then(Value::as_str) {
                saw_text = true;
                text.push_str(t);
            }
        }
        if saw_text {
            vec![StreamRecord::Delta(Delta::Replace(text))]
        } else {
            Vec::new()
        }
    }
}
