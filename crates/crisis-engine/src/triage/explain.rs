use serde::{Deserialize, Serialize};

use super::classifier::{locate_keywords, run_rules, type_profile, RuleKind, CRITICAL_SCORE};
use super::domain::{IncidentType, Severity};

const BASE_CONFIDENCE: u8 = 50;
const CONFIDENCE_CAP: u8 = 98;
const DETAILED_DESCRIPTION_CHARS: usize = 50;
const SUMMARY_KEYWORDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAnalysis {
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub base_score: u8,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleStep {
    pub step: u8,
    pub rule: String,
    pub input: String,
    pub output: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMatch {
    pub keyword: String,
    pub severity: Severity,
    pub reason: String,
    /// Character offset of the first occurrence in the lower-cased description.
    pub text_offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionFactor {
    pub factor: String,
    pub impact: String,
    pub weight: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeScenario {
    pub scenario: String,
    pub result: String,
}

/// Structured rationale behind a classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationTrace {
    pub final_severity: Severity,
    pub final_score: u8,
    pub confidence: u8,
    pub type_analysis: TypeAnalysis,
    pub rule_path: Vec<RuleStep>,
    pub matched_keywords: Vec<KeywordMatch>,
    pub decision_factors: Vec<DecisionFactor>,
    pub alternative_scenarios: Vec<AlternativeScenario>,
    pub summary: String,
}

/// Coarse confidence band shown next to the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    VeryHigh,
    High,
    Moderate,
    Low,
    VeryLow,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: u8) -> Self {
        match confidence {
            90.. => Self::VeryHigh,
            75..=89 => Self::High,
            60..=74 => Self::Moderate,
            40..=59 => Self::Low,
            _ => Self::VeryLow,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
            Self::VeryLow => "Very Low",
        }
    }
}

/// Re-run the classification while recording how the decision was reached.
pub fn explain(kind: IncidentType, description: &str) -> ExplanationTrace {
    let text = description.to_lowercase();
    let profile = type_profile(kind);
    let classification = run_rules(kind, &text);
    let context = classification.context;
    let result = classification.result;

    let mut located = locate_keywords(&text);
    located.sort_by_key(|entry| entry.offset);
    let matched_keywords: Vec<KeywordMatch> = located
        .iter()
        .map(|entry| KeywordMatch {
            keyword: entry.rule.word.to_string(),
            severity: entry.severity,
            reason: entry.rule.reason.to_string(),
            text_offset: entry.offset,
        })
        .collect();

    let mut rule_path = vec![RuleStep {
        step: 1,
        rule: "Type Classification".to_string(),
        input: kind.as_str().to_string(),
        output: format!("Base score: {}", profile.base_score),
        reason: profile.reason.to_string(),
    }];
    let mut decision_factors = Vec::new();

    let severity_output = format!(
        "Severity: {}, Score: {}",
        result.severity.label(),
        result.priority_score
    );
    let (input, reason) = match classification.rule {
        RuleKind::CriticalKeyword => {
            decision_factors.push(DecisionFactor {
                factor: "Critical keyword detected".to_string(),
                impact: "Maximum priority assigned".to_string(),
                weight: "Decisive".to_string(),
            });
            let words = matched_keywords
                .iter()
                .filter(|entry| entry.severity == Severity::Critical)
                .map(|entry| entry.keyword.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            (
                words,
                "Critical keywords indicate life-threatening emergency",
            )
        }
        RuleKind::HighPriority => {
            let factor = if context.high_matched {
                "High-priority keyword detected"
            } else {
                "Incident type has high base priority"
            };
            decision_factors.push(DecisionFactor {
                factor: factor.to_string(),
                impact: "Elevated priority assigned".to_string(),
                weight: "Significant".to_string(),
            });
            let input = if context.high_matched {
                "High-priority keywords found"
            } else {
                "High base score from type"
            };
            (input.to_string(), "Situation requires priority response")
        }
        RuleKind::MediumPriority => {
            let input = if context.medium_matched {
                "Medium-priority keywords found"
            } else {
                "Moderate base score"
            };
            (input.to_string(), "Standard response protocol applies")
        }
        RuleKind::Default => (
            "No priority keywords detected".to_string(),
            "Routine response recommended",
        ),
    };
    rule_path.push(RuleStep {
        step: 2,
        rule: classification.rule.label().to_string(),
        input,
        output: severity_output,
        reason: reason.to_string(),
    });

    let confidence = explanation_confidence(
        matched_keywords.len(),
        text.chars().count(),
        context.critical_matched && context.high_matched,
    );

    let mut alternative_scenarios = Vec::new();
    if result.severity != Severity::Critical {
        alternative_scenarios.push(AlternativeScenario {
            scenario: "If description included critical keywords (trapped, fire, cardiac)"
                .to_string(),
            result: format!("Severity would escalate to CRITICAL ({CRITICAL_SCORE}/100)"),
        });
    }
    if matched_keywords.is_empty() {
        alternative_scenarios.push(AlternativeScenario {
            scenario: "Adding specific details about injuries or hazards".to_string(),
            result: "Would increase confidence and potentially severity".to_string(),
        });
    }

    let type_analysis = TypeAnalysis {
        incident_type: kind,
        base_score: profile.base_score,
        reason: profile.reason.to_string(),
    };
    let summary = summarize(
        &type_analysis,
        result.severity,
        result.priority_score,
        confidence,
        &matched_keywords,
    );

    ExplanationTrace {
        final_severity: result.severity,
        final_score: result.priority_score,
        confidence,
        type_analysis,
        rule_path,
        matched_keywords,
        decision_factors,
        alternative_scenarios,
        summary,
    }
}

pub(crate) fn explanation_confidence(
    match_count: usize,
    description_chars: usize,
    critical_and_high: bool,
) -> u8 {
    let mut confidence = usize::from(BASE_CONFIDENCE) + match_count * 10;
    if match_count > 3 {
        confidence += 15;
    }
    if description_chars > DETAILED_DESCRIPTION_CHARS {
        confidence += 10;
    }
    if critical_and_high {
        confidence += 10;
    }
    let capped = confidence.min(usize::from(CONFIDENCE_CAP));
    u8::try_from(capped).unwrap_or(CONFIDENCE_CAP)
}

fn summarize(
    analysis: &TypeAnalysis,
    severity: Severity,
    score: u8,
    confidence: u8,
    matches: &[KeywordMatch],
) -> String {
    let mut summary = format!(
        "This {} incident was classified as {} with a priority score of {}/100 ({}% confidence). ",
        analysis.incident_type,
        severity.label(),
        score,
        confidence
    );

    if matches.is_empty() {
        summary.push_str("Classification based on incident type baseline. ");
    } else {
        let indicators = matches
            .iter()
            .take(SUMMARY_KEYWORDS)
            .map(|entry| format!("\"{}\"", entry.keyword))
            .collect::<Vec<_>>()
            .join(", ");
        summary.push_str(&format!("Key indicators: {indicators}. "));
    }

    summary.push_str(&analysis.reason);
    summary
}
