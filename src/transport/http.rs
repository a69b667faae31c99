//! Request execution shared by every tier: logging, status classification,
//! body reading and stream driving.

use std::time::Duration;

use futures::StreamExt;
use serde::Serialize;
use serde_json::Value;

use crate::error::{GenerationError, RawFailure, classify_http_error, extract_candidate_text};
use crate::observability::mask_url;
use crate::streaming::{StreamDecoder, UpdateSink};
use crate::types::TierKind;

/// What a request is for, carried into every log line about it.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub tier: TierKind,
    /// URL with any key masked.
    pub url: String,
}

impl RequestContext {
    pub fn new(tier: TierKind, url: &str) -> Self {
        Self {
            tier,
            url: mask_url(url),
        }
    }
}

/// POST a JSON body and return the response if its status is 2xx.
pub async fn post_json<B: Serialize + ?Sized>(
    builder: reqwest::RequestBuilder,
    body: &B,
    timeout: Duration,
    ctx: &RequestContext,
) -> Result<reqwest::Response, GenerationError> {
    tracing::debug!(
        target: "augury::http",
        tier = %ctx.tier,
        url = %ctx.url,
        stream = ctx.tier.is_streaming(),
        "sending request"
    );
    let response = builder
        .timeout(timeout)
        .json(body)
        .send()
        .await
        .map_err(|e| on_error(ctx, GenerationError::from(e)))?;
    check_status(response, ctx).await
}

/// Map a non-2xx response to a classified error.
pub async fn check_status(
    response: reqwest::Response,
    ctx: &RequestContext,
) -> Result<reqwest::Response, GenerationError> {
    let status = response.status();
    tracing::debug!(
        target: "augury::http",
        tier = %ctx.tier,
        url = %ctx.url,
        status = status.as_u16(),
        "response received"
    );
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(on_error(ctx, classify_http_error(status.as_u16(), &body)))
}

/// Read a whole-body response and extract the candidate text.
pub async fn read_candidate_text(
    response: reqwest::Response,
    ctx: &RequestContext,
) -> Result<String, GenerationError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| on_error(ctx, GenerationError::from(e)))?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
        on_error(
            ctx,
            RawFailure::MissingText(format!("body is not JSON: {e}")).into(),
        )
    })?;
    extract_candidate_text(&value).map_err(|e| on_error(ctx, e))
}

/// Feed a streaming body through `decoder`, forwarding each update to `sink`.
///
/// Returns the accumulated text; an empty accumulation is an `EmptyResult`.
pub async fn drive_stream(
    response: reqwest::Response,
    mut decoder: StreamDecoder,
    sink: Option<&dyn UpdateSink>,
    ctx: &RequestContext,
) -> Result<String, GenerationError> {
    let body = response
        .bytes_stream()
        .map(|chunk| chunk.map_err(GenerationError::from));
    let mut updates = 0usize;
    decoder
        .decode(body, |update| {
            updates += 1;
            if let Some(sink) = sink {
                sink.on_update(update);
            }
        })
        .await
        .map_err(|e| on_error(ctx, e))?;

    tracing::debug!(
        target: "augury::http",
        tier = %ctx.tier,
        updates,
        skipped = decoder.skipped(),
        completed = decoder.is_completed(),
        "stream finished"
    );
    let text = decoder.into_text();
    if text.trim().is_empty() {
        return Err(on_error(ctx, RawFailure::EmptyText.into()));
    }
    Ok(text)
}

fn on_error(ctx: &RequestContext, error: GenerationError) -> GenerationError {
    tracing::debug!(
        target: "augury::http",
        tier = %ctx.tier,
        url = %ctx.url,
        err = %error,
        "request error"
    );
    error
}
