//! Orchestrator configuration: everything that is not a user setting.

use std::time::Duration;

use crate::defaults;
use crate::error::GenerationError;
use crate::streaming::Typewriter;
use crate::transport::GenerationConfig;

/// Per-tier time budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierTimeouts {
    pub health_probe: Duration,
    pub proxy: Duration,
    pub direct_stream: Duration,
    pub direct_standard: Duration,
    /// Replaces the direct budgets for requests that carry an image.
    pub vision: Duration,
}

impl Default for TierTimeouts {
    fn default() -> Self {
        Self {
            health_probe: defaults::timeouts::HEALTH_PROBE,
            proxy: defaults::timeouts::PROXY,
            direct_stream: defaults::timeouts::DIRECT_STREAM,
            direct_standard: defaults::timeouts::DIRECT_STANDARD,
            vision: defaults::timeouts::VISION,
        }
    }
}

impl TierTimeouts {
    pub fn direct_stream_for(&self, vision: bool) -> Duration {
        if vision { self.vision } else { self.direct_stream }
    }

    pub fn direct_standard_for(&self, vision: bool) -> Duration {
        if vision { self.vision } else { self.direct_standard }
    }
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Provider models collection, e.g. `https://.../v1beta/models`.
    pub provider_base_url: String,
    pub model: String,
    pub generation: GenerationConfig,
    pub timeouts: TierTimeouts,
    pub typewriter: Typewriter,
    pub user_agent: String,
    pub connect_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            provider_base_url: defaults::provider::BASE_URL.to_string(),
            model: defaults::provider::MODEL.to_string(),
            generation: GenerationConfig::default(),
            timeouts: TierTimeouts::default(),
            typewriter: Typewriter::default(),
            user_agent: defaults::http::USER_AGENT.to_string(),
            connect_timeout: defaults::http::CONNECT_TIMEOUT,
        }
    }
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider_base_url(mut self, url: impl Into<String>) -> Self {
        self.provider_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_timeouts(mut self, timeouts: TierTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_typewriter(mut self, typewriter: Typewriter) -> Self {
        self.typewriter = typewriter;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.provider_base_url.trim().is_empty() {
            return Err(GenerationError::InvalidInput(
                "Provider base URL must not be empty".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(GenerationError::InvalidInput(
                "Model must not be empty".to_string(),
            ));
        }
        if self.generation.max_output_tokens <= 0 {
            return Err(GenerationError::InvalidInput(
                "maxOutputTokens must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The shared HTTP client. Per-request timeouts are set per tier.
    pub fn build_http_client(&self) -> Result<reqwest::Client, GenerationError> {
        reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(GenerationError::from)
    }
}
