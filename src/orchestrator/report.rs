//! Outcome of one generation together with its attempt history.

use uuid::Uuid;

use crate::error::GenerationError;
use crate::types::{TierKind, TransportAttempt};

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub request_id: Uuid,
    pub outcome: Result<String, GenerationError>,
    /// Tier attempts in the order they ran. A probe is not an attempt.
    pub attempts: Vec<TransportAttempt>,
    /// The tier that produced the text, on success.
    pub served_by: Option<TierKind>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn tiers(&self) -> Vec<TierKind> {
        self.attempts.iter().map(|a| a.tier).collect()
    }

    pub fn into_result(self) -> Result<String, GenerationError> {
        self.outcome
    }
}
