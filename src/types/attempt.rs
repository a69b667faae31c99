//! Bookkeeping for individual tier attempts.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ErrorKind, GenerationError};

/// One concrete transport strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TierKind {
    ProxyStream,
    ProxyStandard,
    DirectStream,
    DirectStandard,
}

impl TierKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TierKind::ProxyStream => "proxy-stream",
            TierKind::ProxyStandard => "proxy-standard",
            TierKind::DirectStream => "direct-stream",
            TierKind::DirectStandard => "direct-standard",
        }
    }

    pub const fn is_proxy(&self) -> bool {
        matches!(self, TierKind::ProxyStream | TierKind::ProxyStandard)
    }

    /// Whether the tier delivers real incremental output.
    pub const fn is_streaming(&self) -> bool {
        matches!(self, TierKind::ProxyStream | TierKind::DirectStream)
    }
}

impl std::fmt::Display for TierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(String),
    Failure(GenerationError),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success(_))
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            AttemptOutcome::Success(_) => None,
            AttemptOutcome::Failure(e) => Some(e.kind()),
        }
    }
}

/// One tier try. Lives only as long as the report it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportAttempt {
    pub tier: TierKind,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub outcome: AttemptOutcome,
}

impl TransportAttempt {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_success()
    }
}
