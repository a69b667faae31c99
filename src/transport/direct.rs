//! Client for the model provider's public endpoints.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::GenerationError;
use crate::streaming::{StreamDecoder, UpdateSink};
use crate::types::{ImageInput, TierKind};

use super::http::{RequestContext, check_status, drive_stream, post_json, read_candidate_text};
use super::wire::{GenerateContentRequest, GenerationConfig};

#[derive(Debug, Clone)]
pub struct DirectClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    generation: GenerationConfig,
}

impl DirectClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        model: &str,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            generation,
        }
    }

    /// `POST {base}/{model}:generateContent?key=...`
    pub async fn generate(
        &self,
        api_key: &SecretString,
        prompt: &str,
        image: Option<&ImageInput>,
        timeout: Duration,
    ) -> Result<String, GenerationError> {
        let url = self.method_url("generateContent", api_key);
        let ctx = RequestContext::new(TierKind::DirectStandard, &url);
        let body = GenerateContentRequest::user(prompt, image, self.generation);
        let response = post_json(self.http.post(&url), &body, timeout, &ctx).await?;
        read_candidate_text(response, &ctx).await
    }

    /// `POST {base}/{model}:streamGenerateContent?key=...`
    ///
    /// Every record repeats the cumulative text, so the decoder replaces
    /// rather than appends.
    pub async fn stream(
        &self,
        api_key: &SecretString,
        prompt: &str,
        image: Option<&ImageInput>,
        timeout: Duration,
        sink: Option<&dyn UpdateSink>,
    ) -> Result<String, GenerationError> {
        let url = self.method_url("streamGenerateContent", api_key);
        let ctx = RequestContext::new(TierKind::DirectStream, &url);
        let body = GenerateContentRequest::user(prompt, image, self.generation);
        let response = post_json(self.http.post(&url), &body, timeout, &ctx).await?;
        drive_stream(response, StreamDecoder::direct(), sink, &ctx).await
    }

    /// `GET {base}?key=...`; succeeds when the provider accepts the key.
    pub async fn list_models(
        &self,
        api_key: &SecretString,
        timeout: Duration,
    ) -> Result<(), GenerationError> {
        let url = format!("{}?key={}", self.base_url, api_key.expose_secret());
        let ctx = RequestContext::new(TierKind::DirectStandard, &url);
        tracing::debug!(target: "augury::http", url = %ctx.url, "listing models");
        let response = self
            .http
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(GenerationError::from)?;
        check_status(response, &ctx).await.map(|_| ())
    }

    fn method_url(&self, method: &str, api_key: &SecretString) -> String {
        format!(
            "{}/{}:{method}?key={}",
            self.base_url,
            self.model,
            api_key.expose_secret()
        )
    }
}
