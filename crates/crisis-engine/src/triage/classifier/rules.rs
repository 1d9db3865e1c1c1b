use super::super::domain::Severity;
use serde::{Deserialize, Serialize};

pub(crate) const CRITICAL_SCORE: u8 = 95;
const HIGH_SCORE_FLOOR: u8 = 75;
const MEDIUM_SCORE_FLOOR: u8 = 50;
const HIGH_BASE_THRESHOLD: u8 = 60;
const MEDIUM_BASE_THRESHOLD: u8 = 40;

/// Named severity rules, listed in evaluation precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    CriticalKeyword,
    HighPriority,
    MediumPriority,
    Default,
}

impl RuleKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CriticalKeyword => "Critical Keyword Match",
            Self::HighPriority => "High Priority Assessment",
            Self::MediumPriority => "Medium Priority Assessment",
            Self::Default => "Default Assessment",
        }
    }
}

/// Facts a rule predicate can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RuleContext {
    pub(crate) base_score: u8,
    pub(crate) critical_matched: bool,
    pub(crate) high_matched: bool,
    pub(crate) medium_matched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RuleOutcome {
    pub(crate) severity: Severity,
    pub(crate) score: u8,
}

pub(crate) struct SeverityRule {
    pub(crate) kind: RuleKind,
    applies: fn(&RuleContext) -> bool,
    outcome: fn(&RuleContext) -> RuleOutcome,
}

fn critical_applies(context: &RuleContext) -> bool {
    context.critical_matched
}

fn critical_outcome(_context: &RuleContext) -> RuleOutcome {
    RuleOutcome {
        severity: Severity::Critical,
        score: CRITICAL_SCORE,
    }
}

fn high_applies(context: &RuleContext) -> bool {
    context.high_matched || context.base_score >= HIGH_BASE_THRESHOLD
}

fn high_outcome(context: &RuleContext) -> RuleOutcome {
    RuleOutcome {
        severity: Severity::High,
        score: context.base_score.max(HIGH_SCORE_FLOOR),
    }
}

fn medium_applies(context: &RuleContext) -> bool {
    context.medium_matched || context.base_score >= MEDIUM_BASE_THRESHOLD
}

fn medium_outcome(context: &RuleContext) -> RuleOutcome {
    RuleOutcome {
        severity: Severity::Medium,
        score: context.base_score.max(MEDIUM_SCORE_FLOOR),
    }
}

fn default_applies(_context: &RuleContext) -> bool {
    true
}

fn default_outcome(context: &RuleContext) -> RuleOutcome {
    RuleOutcome {
        severity: Severity::Low,
        score: context.base_score,
    }
}

/// First rule whose predicate holds wins; the last rule always applies.
pub(crate) const SEVERITY_RULES: [SeverityRule; 4] = [
    SeverityRule {
        kind: RuleKind::CriticalKeyword,
        applies: critical_applies,
        outcome: critical_outcome,
    },
    SeverityRule {
        kind: RuleKind::HighPriority,
        applies: high_applies,
        outcome: high_outcome,
    },
    SeverityRule {
        kind: RuleKind::MediumPriority,
        applies: medium_applies,
        outcome: medium_outcome,
    },
    SeverityRule {
        kind: RuleKind::Default,
        applies: default_applies,
        outcome: default_outcome,
    },
];

/// Precedence of the severity rules as evaluated.
pub fn rule_precedence() -> [RuleKind; 4] {
    SEVERITY_RULES.map(|rule| rule.kind)
}

pub(crate) fn evaluate(context: &RuleContext) -> (RuleKind, RuleOutcome) {
    let (kind, outcome) = SEVERITY_RULES
        .iter()
        .find(|rule| (rule.applies)(context))
        .map(|rule| (rule.kind, (rule.outcome)(context)))
        .unwrap_or_else(|| (RuleKind::Default, default_outcome(context)));

    (
        kind,
        RuleOutcome {
            severity: outcome.severity,
            score: outcome.score.min(100),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(base_score: u8, critical: bool, high: bool, medium: bool) -> RuleContext {
        RuleContext {
            base_score,
            critical_matched: critical,
            high_matched: high,
            medium_matched: medium,
        }
    }

    #[test]
    fn precedence_is_critical_high_medium_default() {
        assert_eq!(
            rule_precedence(),
            [
                RuleKind::CriticalKeyword,
                RuleKind::HighPriority,
                RuleKind::MediumPriority,
                RuleKind::Default
            ]
        );
    }

    #[test]
    fn critical_wins_over_every_other_signal() {
        let (kind, outcome) = evaluate(&context(65, true, true, true));
        assert_eq!(kind, RuleKind::CriticalKeyword);
        assert_eq!(outcome.score, 95);
    }

    #[test]
    fn base_score_alone_can_reach_high_and_medium() {
        let (kind, outcome) = evaluate(&context(65, false, false, false));
        assert_eq!((kind, outcome.score), (RuleKind::HighPriority, 75));

        let (kind, outcome) = evaluate(&context(45, false, false, false));
        assert_eq!((kind, outcome.score), (RuleKind::MediumPriority, 50));

        let (kind, outcome) = evaluate(&context(55, false, false, false));
        assert_eq!((kind, outcome.score), (RuleKind::MediumPriority, 55));
    }

    #[test]
    fn default_rule_keeps_the_base_score() {
        let (kind, outcome) = evaluate(&context(25, false, false, false));
        assert_eq!(kind, RuleKind::Default);
        assert_eq!(outcome.severity, Severity::Low);
        assert_eq!(outcome.score, 25);
    }
}
