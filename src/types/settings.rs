//! User-controlled generation settings and the process-wide settings store.

use std::sync::{Arc, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::defaults;

/// Settings snapshot taken at the start of a request.
///
/// The orchestrator never re-reads settings mid-request: callers hand it one
/// snapshot per call.
#[derive(Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationSettings {
    /// Provider API key (securely stored)
    #[serde(deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
    /// Base URL of the optional self-hosted proxy
    pub proxy_base_url: Option<String>,
    /// Whether true streaming tiers are tried before whole-body calls
    pub prefer_streaming: bool,
    /// Word ceiling for replies without a user question
    pub word_limit: u32,
}

impl std::fmt::Debug for GenerationSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationSettings")
            .field("api_key_present", &self.api_key().is_some())
            .field("proxy_base_url", &self.proxy_base_url)
            .field("prefer_streaming", &self.prefer_streaming)
            .field("word_limit", &self.word_limit)
            .finish()
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            proxy_base_url: None,
            prefer_streaming: true,
            word_limit: defaults::prompt::WORD_LIMIT,
        }
    }
}

impl GenerationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(key) = lookup(defaults::env::API_KEY).or_else(|| lookup(defaults::env::GEMINI_API_KEY)) {
            settings = settings.with_api_key(key);
        }
        if let Some(url) = lookup(defaults::env::PROXY_URL) {
            settings = settings.with_proxy_base_url(url);
        }
        if let Some(flag) = lookup(defaults::env::PREFER_STREAMING).and_then(|v| parse_flag(&v)) {
            settings.prefer_streaming = flag;
        }
        if let Some(limit) = lookup(defaults::env::WORD_LIMIT).and_then(|v| v.trim().parse().ok()) {
            settings.word_limit = limit;
        }
        settings
    }

    /// Set the API key; blank keys clear it.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        let key = key.trim();
        self.api_key = if key.is_empty() {
            None
        } else {
            Some(SecretString::from(key.to_string()))
        };
        self
    }

    /// Set the proxy base URL; blank values clear it.
    pub fn with_proxy_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        let url = url.trim().trim_end_matches('/');
        self.proxy_base_url = if url.is_empty() {
            None
        } else {
            Some(url.to_string())
        };
        self
    }

    pub fn without_proxy(mut self) -> Self {
        self.proxy_base_url = None;
        self
    }

    pub const fn with_prefer_streaming(mut self, prefer: bool) -> Self {
        self.prefer_streaming = prefer;
        self
    }

    pub const fn with_word_limit(mut self, limit: u32) -> Self {
        self.word_limit = limit;
        self
    }

    /// The API key, if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key
            .as_ref()
            .filter(|k| !k.expose_secret().trim().is_empty())
    }

    /// The proxy base URL without a trailing slash, if configured.
    pub fn proxy_base_url(&self) -> Option<&str> {
        self.proxy_base_url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(SecretString::from))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Process-wide settings holder.
///
/// Mutation only happens through [`SettingsStore::update`]; requests take a
/// [`SettingsStore::snapshot`] and never observe later updates.
#[derive(Clone, Debug, Default)]
pub struct SettingsStore {
    inner: Arc<RwLock<GenerationSettings>>,
}

impl SettingsStore {
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Clone the current settings.
    pub fn snapshot(&self) -> GenerationSettings {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Apply an update in place.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut GenerationSettings),
    {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
        tracing::debug!(target: "augury::settings", settings = ?*guard, "settings updated");
    }

    /// Replace the settings wholesale.
    pub fn replace(&self, settings: GenerationSettings) {
        self.update(|s| *s = settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn from_lookup_reads_all_variables() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("AUGURY_API_KEY", " key-123 "),
            ("AUGURY_PROXY_URL", "http://proxy.local:8080/"),
            ("AUGURY_PREFER_STREAMING", "off"),
            ("AUGURY_WORD_LIMIT", "600"),
        ]);
        let s = GenerationSettings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(s.api_key().map(|k| k.expose_secret().to_string()).as_deref(), Some("key-123"));
        assert_eq!(s.proxy_base_url(), Some("http://proxy.local:8080"));
        assert!(!s.prefer_streaming);
        assert_eq!(s.word_limit, 600);
    }

    #[test]
    fn from_lookup_falls_back_to_gemini_key_and_defaults() {
        let s = GenerationSettings::from_lookup(|k| {
            (k == "GEMINI_API_KEY").then(|| "gk".to_string())
        });
        assert_eq!(s.api_key().map(|k| k.expose_secret().to_string()).as_deref(), Some("gk"));
        assert!(s.prefer_streaming);
        assert_eq!(s.word_limit, defaults::prompt::WORD_LIMIT);
        assert!(s.proxy_base_url().is_none());
    }

    #[test]
    fn unparsable_values_keep_defaults() {
        let s = GenerationSettings::from_lookup(|k| match k {
            "AUGURY_PREFER_STREAMING" => Some("maybe".into()),
            "AUGURY_WORD_LIMIT" => Some("lots".into()),
            _ => None,
        });
        assert!(s.prefer_streaming);
        assert_eq!(s.word_limit, defaults::prompt::WORD_LIMIT);
    }

    #[test]
    fn blank_values_clear_fields() {
        let s = GenerationSettings::new()
            .with_api_key("   ")
            .with_proxy_base_url(" / ");
        assert!(s.api_key().is_none());
        assert!(s.proxy_base_url().is_none());
    }

    #[test]
    fn debug_does_not_leak_key() {
        let s = GenerationSettings::new().with_api_key("super-secret");
        let dbg = format!("{s:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("api_key_present: true"));
    }

    #[test]
    fn deserializes_camel_case_json() {
        let s: GenerationSettings = serde_json::from_str(
            r#"{"apiKey":"abc","proxyBaseUrl":"http://p","preferStreaming":false,"wordLimit":300}"#,
        )
        .expect("settings");
        assert!(s.api_key().is_some());
        assert_eq!(s.proxy_base_url(), Some("http://p"));
        assert!(!s.prefer_streaming);
        assert_eq!(s.word_limit, 300);
    }

    #[test]
    fn snapshot_is_isolated_from_later_updates() {
        let store = SettingsStore::new(GenerationSettings::new().with_word_limit(100));
        let snap = store.snapshot();
        store.update(|s| s.word_limit = 200);
        assert_eq!(snap.word_limit, 100);
        assert_eq!(store.snapshot().word_limit, 200);

        store.replace(GenerationSettings::new().with_proxy_base_url("http://x"));
        assert_eq!(store.snapshot().proxy_base_url(), Some("http://x"));
    }
}
