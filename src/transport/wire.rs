//! Request bodies shared by the proxy and the provider.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::types::ImageInput;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// A single user turn with the prompt and an optional inline image.
    pub fn user(prompt: &str, image: Option<&ImageInput>, config: GenerationConfig) -> Self {
        let mut parts = vec![Part::Text {
            text: prompt.to_string(),
        }];
        if let Some(image) = image {
            parts.push(Part::InlineData {
                inline_data: Blob {
                    mime_type: image.mime_type().to_string(),
                    data: image.data().to_string(),
                },
            });
        }
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            generation_config: config,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: Blob },
}

/// Inline binary data; field names are snake_case on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub mime_type: String,
    /// Base64
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: i32,
    pub top_p: f64,
    pub max_output_tokens: i32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: defaults::generation::TEMPERATURE,
            top_k: defaults::generation::TOP_K,
            top_p: defaults::generation::TOP_P,
            max_output_tokens: defaults::generation::MAX_OUTPUT_TOKENS,
        }
    }
}

/// Body of the proxy's text stream endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyStreamRequest {
    pub prompt: String,
    pub max_tokens: i32,
}

/// `GET /api/health` body.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("ok")
    }
}
