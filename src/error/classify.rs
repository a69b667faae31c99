//! Failure classification
//!
//! Maps heterogeneous transport, HTTP and body failures onto the closed
//! [`ErrorKind`] taxonomy. Messages are written for end users; provider text is
//! only embedded where it is useful and bounded (HTTP 400 details, explicit
//! error records).

use serde_json::Value;

use super::types::GenerationError;

/// Maximum number of characters of provider detail embedded in a message.
const DETAIL_LIMIT: usize = 200;

/// A failure before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFailure {
    /// The request never produced a response (connect/DNS/socket failure).
    NoResponse(String),
    /// A timeout fired at any stage of the call.
    TimedOut(String),
    /// A non-2xx HTTP status with the (possibly empty) body text.
    Status { status: u16, body: String },
    /// A 2xx body without the expected candidate/text field.
    MissingText(String),
    /// A 2xx body whose candidate text is empty or whitespace.
    EmptyText,
    /// Anything that does not fit the cases above.
    Other(String),
}

/// Classify a raw failure. Total over every [`RawFailure`].
pub fn classify(failure: RawFailure) -> GenerationError {
    match failure {
        RawFailure::NoResponse(cause) => {
            tracing::debug!(target: "augury::error", %cause, "no response");
            GenerationError::NetworkUnreachable(
                "Could not reach the generation service. Check your network connection."
                    .to_string(),
            )
        }
        RawFailure::TimedOut(cause) => {
            tracing::debug!(target: "augury::error", %cause, "timed out");
            GenerationError::Timeout(
                "The generation service took too long to respond. Please try again.".to_string(),
            )
        }
        RawFailure::Status { status, body } => classify_http_error(status, &body),
        RawFailure::MissingText(what) => GenerationError::MalformedResponse(format!(
            "The generation service returned a response in an unexpected format ({what})."
        )),
        RawFailure::EmptyText => GenerationError::EmptyResult(
            "The generation service returned an empty result.".to_string(),
        ),
        RawFailure::Other(cause) => GenerationError::Unknown(format!(
            "An unexpected error occurred: {}",
            truncate(&cause)
        )),
    }
}

/// Classify a non-2xx HTTP response.
pub fn classify_http_error(status: u16, body_text: &str) -> GenerationError {
    match status {
        400 => {
            let base = "The request was rejected as invalid";
            match provider_detail(body_text) {
                Some(detail) => GenerationError::InvalidInput(format!("{base}: {detail}")),
                None => GenerationError::InvalidInput(format!("{base}.")),
            }
        }
        401 => GenerationError::AuthInvalid(
            "The API key was rejected. Check the key in settings.".to_string(),
        ),
        403 => GenerationError::PermissionDenied(
            "The API key is not permitted to use this model or service.".to_string(),
        ),
        413 => GenerationError::InvalidInput(
            "The request payload is too large. Try a smaller image.".to_string(),
        ),
        429 => GenerationError::RateLimited(
            "Too many requests. Please wait a moment and try again.".to_string(),
        ),
        500..=599 => GenerationError::server_fault(
            Some(status),
            format!("The generation service had an internal problem (HTTP {status})."),
        ),
        _ => GenerationError::Unknown(format!(
            "The generation service answered with an unexpected status (HTTP {status})."
        )),
    }
}

/// Classify a `reqwest` failure.
pub fn classify_reqwest_error(err: reqwest::Error) -> GenerationError {
    // The request URL carries the API key as a query parameter.
    let err = err.without_url();
    if err.is_timeout() {
        return classify(RawFailure::TimedOut(err.to_string()));
    }
    if let Some(status) = err.status() {
        return classify_http_error(status.as_u16(), "");
    }
    if err.is_connect() || err.is_request() || err.is_body() {
        return classify(RawFailure::NoResponse(err.to_string()));
    }
    if err.is_decode() {
        return classify(RawFailure::MissingText(format!("undecodable body: {err}")));
    }
    if err.is_builder() {
        return GenerationError::InvalidInput(format!(
            "The request could not be built: {}",
            truncate(&err.to_string())
        ));
    }
    classify(RawFailure::Other(err.to_string()))
}

/// Extract a short provider-supplied error description from a body.
///
/// Understands the provider envelope `{"error": {"message": ...}}` and the
/// proxy envelope `{"error": "..."}`; falls back to a plain-text body.
pub fn provider_detail(body_text: &str) -> Option<String> {
    let trimmed = body_text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(json) => error_record_message(&json).map(|m| truncate(&m)),
        Err(_) if !trimmed.starts_with('<') => Some(truncate(trimmed)),
        Err(_) => None,
    }
}

/// Read the message of an `error` field, if the value carries one.
pub fn error_record_message(value: &Value) -> Option<String> {
    let error = value.get("error")?;
    match error {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| Some("unspecified error".to_string())),
        Value::Null => None,
        other => Some(truncate(&other.to_string())),
    }
}

/// Pull the generated text out of a `generateContent`-shaped body.
///
/// Text parts of the first candidate are concatenated (thought parts are
/// skipped). An empty candidate list, a blocked prompt, or blank text is an
/// `EmptyResult`; a body without the candidate/text structure is a
/// `MalformedResponse`; an embedded `error` record is a `ServerFault`.
pub fn extract_candidate_text(value: &Value) -> Result<String, GenerationError> {
    if let Some(detail) = error_record_message(value) {
        return Err(GenerationError::server_fault(
            None,
            format!(
                "The generation service reported an error: {}",
                truncate(&detail)
            ),
        ));
    }

    let Some(candidates) = value.get("candidates") else {
        if let Some(reason) = value
            .get("promptFeedback")
            .and_then(|f| f.get("blockReason"))
            .and_then(Value::as_str)
        {
            return Err(GenerationError::EmptyResult(format!(
                "The request was blocked by the provider ({reason})."
            )));
        }
        return Err(classify(RawFailure::MissingText("no candidates".into())));
    };
    let Some(candidates) = candidates.as_array() else {
        return Err(classify(RawFailure::MissingText(
            "candidates is not a list".into(),
        )));
    };
    let Some(first) = candidates.first() else {
        return Err(classify(RawFailure::EmptyText));
    };

    let parts = first
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array);
    let Some(parts) = parts else {
        // A finish reason without content means the candidate was cut off or filtered.
        if first.get("finishReason").is_some() {
            return Err(classify(RawFailure::EmptyText));
        }
        return Err(classify(RawFailure::MissingText("candidate has no content".into())));
    };

    let mut saw_text = false;
    let mut text = String::new();
    for part in parts {
        if part.get("thought").and_then(Value::as_bool) == Some(true) {
            continue;
        }
        if let Some(t) = part.get("text").and_then(Value::as_str) {
            saw_text = true;
            text.push_str(t);
        }
    }
    if !saw_text {
        return Err(classify(RawFailure::MissingText("candidate has no text part".into())));
    }
    if text.trim().is_empty() {
        return Err(classify(RawFailure::EmptyText));
    }
    Ok(text)
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= DETAIL_LIMIT {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(DETAIL_LIMIT).collect();
        out.push('…');
        out
    }
}
