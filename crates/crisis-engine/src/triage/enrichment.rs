use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::explain::ExplanationTrace;

/// Narrative reported when no generated explanation could be attached.
pub const ENRICHMENT_UNAVAILABLE: &str = "AI explanation unavailable";

/// Generative-text collaborator that narrates a deterministic trace.
#[async_trait]
pub trait ExplanationEnricher: Send + Sync {
    async fn enrich(&self, trace: &ExplanationTrace) -> Result<String, EnrichmentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("enrichment backend unavailable: {0}")]
    Unavailable(String),
    #[error("enrichment timed out after {0:?}")]
    TimedOut(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    Available,
    Unavailable,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentInfo {
    pub status: EnrichmentStatus,
}

/// Deterministic trace plus the optional generated narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedExplanation {
    pub trace: ExplanationTrace,
    pub narrative: String,
    pub enrichment: EnrichmentInfo,
}

impl EnrichedExplanation {
    pub(crate) fn available(trace: ExplanationTrace, narrative: String) -> Self {
        Self {
            trace,
            narrative,
            enrichment: EnrichmentInfo {
                status: EnrichmentStatus::Available,
            },
        }
    }

    pub(crate) fn fallback(trace: ExplanationTrace, status: EnrichmentStatus) -> Self {
        Self {
            trace,
            narrative: ENRICHMENT_UNAVAILABLE.to_string(),
            enrichment: EnrichmentInfo { status },
        }
    }
}
