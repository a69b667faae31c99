//! Default Configuration Values
//!
//! This module centralizes the default values used throughout the pipeline.
//! Having defaults in one place makes them easier to maintain, document, and adjust.

use std::time::Duration;

/// HTTP client defaults
pub mod http {
    use super::*;

    /// Connection establishment timeout shared by every tier.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("augury/", env!("CARGO_PKG_VERSION"));
}

/// Per-tier timeouts
pub mod timeouts {
    use super::*;

    /// Health probe gate in front of the proxy tiers.
    pub const HEALTH_PROBE: Duration = Duration::from_secs(5);

    /// Proxy calls (streaming and whole-body).
    pub const PROXY: Duration = Duration::from_secs(60);

    /// Direct streaming call before falling back to the whole-body call.
    pub const DIRECT_STREAM: Duration = Duration::from_secs(30);

    /// Direct whole-body call.
    pub const DIRECT_STANDARD: Duration = Duration::from_secs(60);

    /// Any call that carries an inline image.
    pub const VISION: Duration = Duration::from_secs(60);
}

/// Provider endpoint defaults
pub mod provider {
    /// Models collection of the provider; `{BASE}/{model}:generateContent`.
    pub const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

    pub const MODEL: &str = "gemini-2.0-flash";

    /// Google API keys: `AIza` followed by 35 URL-safe characters.
    pub const API_KEY_PATTERN: &str = r"^AIza[0-9A-Za-z_\-]{35}$";
}

/// Proxy endpoint paths (relative to the proxy base URL)
pub mod proxy {
    pub const HEALTH: &str = "/api/health";
    pub const GENERATE: &str = "/api/gemini/generate";
    pub const STREAM: &str = "/api/gemini/stream";
    pub const VISION: &str = "/api/gemini/vision";
    pub const VISION_STREAM: &str = "/api/gemini/vision-stream";
}

/// Sampling parameters sent with every request
pub mod generation {
    pub const TEMPERATURE: f64 = 0.7;
    pub const TOP_K: i32 = 40;
    pub const TOP_P: f64 = 0.95;
    pub const MAX_OUTPUT_TOKENS: i32 = 8192;
}

/// Simulated streaming cadence
pub mod typewriter {
    use super::*;

    /// Code points revealed per frame.
    pub const CHUNK_SIZE: usize = 3;

    pub const INTERVAL: Duration = Duration::from_millis(30);
}

/// Prompt assembly defaults
pub mod prompt {
    /// Word ceiling when the payload carries no user question.
    pub const WORD_LIMIT: u32 = 800;

    /// Extra words allowed when a question must be addressed.
    pub const QUESTION_BONUS_WORDS: u32 = 400;

    /// Language the reply must be written in.
    pub const REPLY_LANGUAGE: &str = "Simplified Chinese";
}

/// Image input limits
pub mod image {
    /// Decoded byte ceiling enforced before any network call (1 MiB).
    pub const MAX_BYTES: usize = 1024 * 1024;

    pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];
}

/// Environment variable names read by `GenerationSettings::from_env`
pub mod env {
    pub const API_KEY: &str = "AUGURY_API_KEY";
    /// Fallback key variable shared with other Gemini tooling.
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const PROXY_URL: &str = "AUGURY_PROXY_URL";
    pub const PREFER_STREAMING: &str = "AUGURY_PREFER_STREAMING";
    pub const WORD_LIMIT: &str = "AUGURY_WORD_LIMIT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_are_ordered() {
        assert!(timeouts::HEALTH_PROBE < timeouts::DIRECT_STREAM);
        assert!(timeouts::DIRECT_STREAM <= timeouts::VISION);
    }

    #[test]
    fn image_ceiling_is_one_mebibyte() {
        assert_eq!(image::MAX_BYTES, 1_048_576);
        assert_eq!(image::ALLOWED_MIME_TYPES.len(), 4);
    }
}
