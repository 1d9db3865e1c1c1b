//! Per-report decisions: severity classification, visual augmentation,
//! resource planning, explanation traces, the offline advisory estimate and
//! what-if response simulation.

pub mod classifier;
pub mod domain;
pub mod enrichment;
pub mod explain;
pub mod offline;
pub mod resources;
pub mod router;
pub mod service;
pub mod simulation;

#[cfg(test)]
mod tests;

pub use classifier::{
    augment, classify, classify_raw, rule_precedence, AugmentedSeverity, RuleKind,
    SeverityEvidence, SeverityResult, VisualRule,
};
pub use domain::{IncidentInput, IncidentType, Severity, VisualSignal};
pub use enrichment::{
    EnrichedExplanation, EnrichmentError, EnrichmentStatus, ExplanationEnricher,
    ENRICHMENT_UNAVAILABLE,
};
pub use explain::{explain, ConfidenceBand, ExplanationTrace, KeywordMatch, RuleStep};
pub use offline::{estimate_offline, EstimateConfidence, OfflineEstimate};
pub use resources::{plan, ResourcePlan, ResourcePriority, ResourceRequirement, SupplyItem};
pub use router::triage_router;
pub use service::{IncidentAssessment, IncidentClassification, TriageService};
pub use simulation::{
    base_response_minutes, compare_scenarios, scenario_presets, simulate, OutcomeRisk,
    ResponseConfig, Scenario, ScenarioOutcome, SimulatedIncident, SimulationResult,
};
