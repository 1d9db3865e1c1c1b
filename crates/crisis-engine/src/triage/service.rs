use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::classifier::{augment, classify, SeverityEvidence, VisualRule};
use super::domain::{IncidentInput, IncidentType, Severity};
use super::enrichment::{EnrichedExplanation, EnrichmentError, EnrichmentStatus, ExplanationEnricher};
use super::explain::explain;
use super::resources::{plan, ResourcePlan};

pub const DEFAULT_ENRICHMENT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Authoritative classification returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentClassification {
    pub severity: Severity,
    pub priority_score: u8,
    pub evidence: SeverityEvidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_rule: Option<VisualRule>,
}

/// Classification and plan from a single pass over a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentAssessment {
    pub classification: IncidentClassification,
    pub plan: ResourcePlan,
}

/// Service composing the classifier, planner, explainer and optional enricher.
pub struct TriageService {
    enricher: Option<Arc<dyn ExplanationEnricher>>,
    enrichment_timeout: Duration,
}

impl Default for TriageService {
    fn default() -> Self {
        Self::new(DEFAULT_ENRICHMENT_TIMEOUT)
    }
}

impl TriageService {
    pub fn new(enrichment_timeout: Duration) -> Self {
        Self {
            enricher: None,
            enrichment_timeout,
        }
    }

    pub fn with_enricher(mut self, enricher: Arc<dyn ExplanationEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn enrichment_enabled(&self) -> bool {
        self.enricher.is_some()
    }

    /// Classify a report and apply its visual signal.
    pub fn analyze(&self, input: &IncidentInput) -> IncidentClassification {
        let base = classify(input.incident_type, &input.description);
        let augmented = augment(&base, input.visual_signal.as_ref(), &input.description);

        info!(
            incident_type = %input.incident_type,
            severity = %augmented.severity,
            priority_score = augmented.priority_score,
            visual_rule = ?augmented.visual_rule,
            "incident analyzed"
        );

        IncidentClassification {
            severity: augmented.severity,
            priority_score: augmented.priority_score,
            evidence: base.evidence,
            visual_rule: augmented.visual_rule,
        }
    }

    pub fn plan(
        &self,
        kind: IncidentType,
        severity: Option<Severity>,
        description: &str,
    ) -> ResourcePlan {
        let resource_plan = plan(kind, severity, description);
        debug!(
            incident_type = %kind,
            resources = resource_plan.resources.len(),
            personnel = resource_plan.required_personnel,
            "resource plan built"
        );
        resource_plan
    }

    /// Full pipeline: the plan is built from the augmented severity.
    pub fn assess(&self, input: &IncidentInput) -> IncidentAssessment {
        let classification = self.analyze(input);
        let plan = self.plan(
            input.incident_type,
            Some(classification.severity),
            &input.description,
        );
        IncidentAssessment {
            classification,
            plan,
        }
    }

    /// Deterministic trace, narrated by the enricher when one is configured.
    pub async fn explain(&self, kind: IncidentType, description: &str) -> EnrichedExplanation {
        let trace = explain(kind, description);
        let Some(enricher) = self.enricher.as_ref() else {
            return EnrichedExplanation::fallback(trace, EnrichmentStatus::Disabled);
        };

        let outcome = tokio::time::timeout(self.enrichment_timeout, enricher.enrich(&trace))
            .await
            .unwrap_or(Err(EnrichmentError::TimedOut(self.enrichment_timeout)));

        match outcome {
            Ok(narrative) => EnrichedExplanation::available(trace, narrative),
            Err(error) => {
                warn!(error = %error, incident_type = %kind, "explanation enrichment failed");
                EnrichedExplanation::fallback(trace, EnrichmentStatus::Unavailable)
            }
        }
    }
}
