use super::common::*;

use crate::triage::classifier::{classify, RuleKind};
use crate::triage::domain::{IncidentType, Severity};
use crate::triage::explain::{explain, explanation_confidence, ConfidenceBand};

#[test]
fn trace_agrees_with_classifier() {
    let cases = [
        (IncidentType::Fire, "Large structure fire, people trapped inside"),
        (IncidentType::Other, ""),
        (IncidentType::Police, "Robbery at the corner store"),
        (IncidentType::Flood, "basement flooding, minor injury"),
        (IncidentType::Medical, "Elderly man, chest pain and choking"),
        (IncidentType::Accident, "suspicious vehicle"),
    ];
    for (kind, description) in cases {
        let trace = explain(kind, description);
        let result = classify(kind, description);
        assert_eq!(trace.final_severity, result.severity, "{description}");
        assert_eq!(trace.final_score, result.priority_score, "{description}");
    }
}

#[test]
fn rule_path_has_type_step_then_fired_rule() {
    let input = structure_fire();
    let trace = explain(input.incident_type, &input.description);

    assert_eq!(trace.rule_path.len(), 2);
    assert_eq!(trace.rule_path[0].step, 1);
    assert_eq!(trace.rule_path[0].rule, "Type Classification");
    assert_eq!(trace.rule_path[0].input, "fire");
    assert_eq!(trace.rule_path[0].output, "Base score: 65");
    assert_eq!(trace.rule_path[1].rule, RuleKind::CriticalKeyword.label());
    assert_eq!(trace.rule_path[1].input, "fire, trapped");
    assert_eq!(trace.rule_path[1].output, "Severity: CRITICAL, Score: 95");
    assert_eq!(trace.decision_factors.len(), 1);
    assert_eq!(trace.decision_factors[0].weight, "Decisive");
    assert!(trace.alternative_scenarios.is_empty());
    assert_eq!(trace.confidence, 70);
}

#[test]
fn keywords_are_sorted_by_first_occurrence() {
    let description =
        "Smoke alarm went off, then fire spread to the garage and a man is unconscious";
    let trace = explain(IncidentType::Medical, description);

    let order: Vec<(&str, usize)> = trace
        .matched_keywords
        .iter()
        .map(|entry| (entry.keyword.as_str(), entry.text_offset))
        .collect();
    assert_eq!(
        order,
        vec![("smoke", 0), ("alarm", 6), ("fire", 27), ("unconscious", 66)]
    );
    assert_eq!(trace.matched_keywords[0].severity, Severity::Medium);
    assert_eq!(trace.confidence, 98);
    assert!(trace
        .summary
        .contains("Key indicators: \"smoke\", \"alarm\", \"fire\". "));
}

#[test]
fn type_baseline_high_reports_significant_factor() {
    let trace = explain(IncidentType::Fire, "");
    assert_eq!(trace.final_severity, Severity::High);
    assert_eq!(trace.rule_path[1].rule, "High Priority Assessment");
    assert_eq!(trace.rule_path[1].input, "High base score from type");
    assert_eq!(
        trace.decision_factors[0].factor,
        "Incident type has high base priority"
    );
    assert_eq!(trace.decision_factors[0].weight, "Significant");
}

#[test]
fn empty_report_explains_baseline_with_two_scenarios() {
    let trace = explain(IncidentType::Other, "");
    assert_eq!(trace.rule_path[1].rule, "Default Assessment");
    assert!(trace.decision_factors.is_empty());
    assert_eq!(trace.alternative_scenarios.len(), 2);
    assert_eq!(
        trace.summary,
        "This other incident was classified as LOW with a priority score of 25/100 \
         (50% confidence). Classification based on incident type baseline. \
         Unclassified incident - requires assessment"
    );
}

#[test]
fn medium_rule_has_no_decision_factor() {
    let trace = explain(IncidentType::Other, "vandalism on the bus shelter");
    assert_eq!(trace.final_severity, Severity::Medium);
    assert_eq!(trace.rule_path[1].input, "Medium-priority keywords found");
    assert!(trace.decision_factors.is_empty());
    assert_eq!(trace.alternative_scenarios.len(), 1);
}

#[test]
fn confidence_formula_caps_at_ninety_eight() {
    assert_eq!(explanation_confidence(0, 0, false), 50);
    assert_eq!(explanation_confidence(1, 51, false), 70);
    assert_eq!(explanation_confidence(3, 50, true), 90);
    assert_eq!(explanation_confidence(4, 10, false), 98);
    assert_eq!(explanation_confidence(4, 60, true), 98);
}

#[test]
fn confidence_bands_follow_thresholds() {
    assert_eq!(ConfidenceBand::from_confidence(98), ConfidenceBand::VeryHigh);
    assert_eq!(ConfidenceBand::from_confidence(75), ConfidenceBand::High);
    assert_eq!(ConfidenceBand::from_confidence(60), ConfidenceBand::Moderate);
    assert_eq!(ConfidenceBand::from_confidence(40).label(), "Low");
    assert_eq!(ConfidenceBand::from_confidence(39).label(), "Very Low");
}
