mod keywords;
mod rules;
mod visual;

use serde::{Deserialize, Serialize};

use super::domain::{IncidentType, Severity};

pub(crate) use keywords::{locate_keywords, type_profile, KEYWORD_BANDS};
pub(crate) use rules::{evaluate, RuleContext, CRITICAL_SCORE};
pub use rules::{rule_precedence, RuleKind};
pub use visual::{augment, AugmentedSeverity, VisualRule, VISUAL_CONFIDENCE_THRESHOLD};

/// Which inputs drove the classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityEvidence {
    pub type_base_score: u8,
    pub critical_matched: bool,
    pub high_matched: bool,
    pub medium_matched: bool,
}

/// Deterministic classification of a single report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityResult {
    pub severity: Severity,
    pub priority_score: u8,
    pub evidence: SeverityEvidence,
}

/// Rule context plus the rule that fired; shared by `classify` and the explainer.
pub(crate) struct Classification {
    pub(crate) context: RuleContext,
    pub(crate) rule: RuleKind,
    pub(crate) result: SeverityResult,
}

pub(crate) fn run_rules(kind: IncidentType, lowered_description: &str) -> Classification {
    let base_score = type_profile(kind).base_score;
    let [critical, high, medium] = KEYWORD_BANDS;
    let context = RuleContext {
        base_score,
        critical_matched: critical.matches_any(lowered_description),
        high_matched: high.matches_any(lowered_description),
        medium_matched: medium.matches_any(lowered_description),
    };
    let (rule, outcome) = evaluate(&context);

    Classification {
        context,
        rule,
        result: SeverityResult {
            severity: outcome.severity,
            priority_score: outcome.score,
            evidence: SeverityEvidence {
                type_base_score: base_score,
                critical_matched: context.critical_matched,
                high_matched: context.high_matched,
                medium_matched: context.medium_matched,
            },
        },
    }
}

/// Classify an incident from its type and free-text description.
pub fn classify(kind: IncidentType, description: &str) -> SeverityResult {
    run_rules(kind, &description.to_lowercase()).result
}

/// Same as [`classify`], parsing the type from a raw string first.
pub fn classify_raw(raw_type: Option<&str>, description: Option<&str>) -> SeverityResult {
    let kind = raw_type.map(IncidentType::parse).unwrap_or_default();
    classify(kind, description.unwrap_or_default())
}
