//! Client for the self-hosted proxy.

use std::time::Duration;

use crate::defaults;
use crate::error::GenerationError;
use crate::streaming::{StreamDecoder, UpdateSink};
use crate::types::{ImageInput, TierKind};

use super::http::{RequestContext, drive_stream, post_json, read_candidate_text};
use super::wire::{GenerateContentRequest, GenerationConfig, ProxyStreamRequest};

#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: String,
    generation: GenerationConfig,
}

impl ProxyClient {
    pub fn new(http: reqwest::Client, base_url: &str, generation: GenerationConfig) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            generation,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whole-body call: `/api/gemini/generate`, or `/api/gemini/vision` with an image.
    pub async fn generate(
        &self,
        prompt: &str,
        image: Option<&ImageInput>,
        timeout: Duration,
    ) -> Result<String, GenerationError> {
        let path = if image.is_some() {
            defaults::proxy::VISION
        } else {
            defaults::proxy::GENERATE
        };
        let url = self.url(path);
        let ctx = RequestContext::new(TierKind::ProxyStandard, &url);
        let body = GenerateContentRequest::user(prompt, image, self.generation);
        let response = post_json(self.http.post(&url), &body, timeout, &ctx).await?;
        read_candidate_text(response, &ctx).await
    }

    /// Streaming call: `/api/gemini/stream`, or `/api/gemini/vision-stream` with an image.
    pub async fn stream(
        &self,
        prompt: &str,
        image: Option<&ImageInput>,
        timeout: Duration,
        sink: Option<&dyn UpdateSink>,
    ) -> Result<String, GenerationError> {
        match image {
            Some(image) => {
                let url = self.url(defaults::proxy::VISION_STREAM);
                let ctx = RequestContext::new(TierKind::ProxyStream, &url);
                let body = GenerateContentRequest::user(prompt, Some(image), self.generation);
                let response = post_json(self.http.post(&url), &body, timeout, &ctx).await?;
                drive_stream(response, StreamDecoder::proxy_vision(), sink, &ctx).await
            }
            None => {
                let url = self.url(defaults::proxy::STREAM);
                let ctx = RequestContext::new(TierKind::ProxyStream, &url);
                let body = ProxyStreamRequest {
                    prompt: prompt.to_string(),
                    max_tokens: self.generation.max_output_tokens,
                };
                let response = post_json(self.http.post(&url), &body, timeout, &ctx).await?;
                drive_stream(response, StreamDecoder::proxy_text(), sink, &ctx).await
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
