//! Liveness gate in front of the proxy tiers.

use std::time::Duration;

use crate::defaults;

use super::wire::HealthStatus;

#[derive(Debug, Clone)]
pub struct HealthProbe {
    http: reqwest::Client,
    timeout: Duration,
}

impl HealthProbe {
    pub fn new(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// `true` only for a 2xx answer whose body reports `status: "ok"` within
    /// the timeout. Never fails; results are not cached.
    pub async fn probe(&self, base_url: &str) -> bool {
        let url = format!(
            "{}{}",
            base_url.trim_end_matches('/'),
            defaults::proxy::HEALTH
        );
        let response = match self.http.get(&url).timeout(self.timeout).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(target: "augury::health", %url, err = %e, timeout = e.is_timeout(), "probe failed");
                return false;
            }
        };
        if !response.status().is_success() {
            tracing::debug!(target: "augury::health", %url, status = response.status().as_u16(), "probe rejected");
            return false;
        }
        match response.json::<HealthStatus>().await {
            Ok(status) if status.is_ok() => {
                tracing::debug!(target: "augury::health", %url, "proxy healthy");
                true
            }
            Ok(status) => {
                tracing::debug!(target: "augury::health", %url, status = %status.status, "proxy not ok");
                false
            }
            Err(e) => {
                tracing::debug!(target: "augury::health", %url, err = %e, "unreadable probe body");
                false
            }
        }
    }
}
