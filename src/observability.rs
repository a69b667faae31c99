//! Tracing setup and log hygiene
//!
//! ```rust,ignore
//! use augury::observability::{init_tracing, OutputFormat, TracingConfig};
//!
//! init_tracing(&TracingConfig::builder().log_level_str("debug")?.output_format(OutputFormat::Json).build())?;
//! ```

use tracing_subscriber::EnvFilter;

use crate::error::GenerationError;

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// Single-line text format
    Compact,
    /// One JSON object per event
    Json,
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
    /// Include span enter/exit events.
    pub with_spans: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
            with_spans: false,
        }
    }
}

impl TracingConfig {
    pub fn builder() -> TracingConfigBuilder {
        TracingConfigBuilder::default()
    }

    pub fn debug() -> Self {
        Self {
            log_level: tracing::Level::DEBUG,
            ..Self::default()
        }
    }

    /// Directive used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> String {
        format!("augury={}", level_str(self.log_level))
    }
}

#[derive(Debug, Default)]
pub struct TracingConfigBuilder {
    log_level: Option<tracing::Level>,
    output_format: Option<OutputFormat>,
    with_spans: Option<bool>,
}

impl TracingConfigBuilder {
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set the log level from a string
    pub fn log_level_str(mut self, level: &str) -> Result<Self, GenerationError> {
        let level = match level.trim().to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            other => {
                return Err(GenerationError::InvalidInput(format!(
                    "Invalid log level: {other}. Valid options: trace, debug, info, warn, error"
                )));
            }
        };
        self.log_level = Some(level);
        Ok(self)
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_spans(mut self, enable: bool) -> Self {
        self.with_spans = Some(enable);
        self
    }

    pub fn build(self) -> TracingConfig {
        TracingConfig {
            log_level: self.log_level.unwrap_or(tracing::Level::INFO),
            output_format: self.output_format.unwrap_or_default(),
            with_spans: self.with_spans.unwrap_or(false),
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// Fails with `InvalidInput` if a global subscriber is already installed.
pub fn init_tracing(config: &TracingConfig) -> Result<(), GenerationError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));
    let span_events = if config.with_spans {
        tracing_subscriber::fmt::format::FmtSpan::NEW | tracing_subscriber::fmt::format::FmtSpan::CLOSE
    } else {
        tracing_subscriber::fmt::format::FmtSpan::NONE
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_span_events(span_events);
    let result = match config.output_format {
        OutputFormat::Text => builder.try_init(),
        OutputFormat::Compact => builder.compact().try_init(),
        OutputFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| {
        GenerationError::InvalidInput(format!("Tracing could not be initialised: {e}"))
    })
}

/// Mask a secret for logging, keeping only a short prefix and suffix.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 12 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Mask the value of a `key=` query parameter.
pub fn mask_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let masked: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some(("key", value)) => format!("key={}", mask_secret(value)),
            _ => pair.to_string(),
        })
        .collect();
    format!("{base}?{}", masked.join("&"))
}

fn level_str(level: tracing::Level) -> String {
    level.as_str().to_ascii_lowercase()
}
