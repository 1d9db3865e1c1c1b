//! Advisory severity estimate computed while a report waits in the offline queue.
//!
//! The estimate uses its own keyword lists and additive scoring. It is shown to
//! the reporter only and never replaces the server-side classification.

use serde::{Deserialize, Serialize};

use super::domain::{IncidentType, Severity};

pub const OFFLINE_DISCLAIMER: &str =
    "Preliminary Offline AI Estimate. Final validation happens server-side.";

const MATCHED_KEYWORD_LIMIT: usize = 5;

const OFFLINE_CRITICAL: &[&str] = &[
    "explosion",
    "bomb",
    "terrorist",
    "shooting",
    "mass casualty",
    "building collapse",
    "trapped",
    "multiple fatalities",
    "nuclear",
    "chemical spill",
    "gas leak",
    "hostage",
    "active shooter",
    "major earthquake",
    "tsunami",
    "tornado",
];

const OFFLINE_HIGH: &[&str] = &[
    "fire",
    "burning",
    "flood",
    "drowning",
    "unconscious",
    "heart attack",
    "stroke",
    "severe bleeding",
    "blood",
    "car accident",
    "crash",
    "collision",
    "electrocution",
    "poisoning",
    "overdose",
    "assault",
    "violence",
    "child missing",
    "kidnapping",
    "armed",
];

const OFFLINE_MEDIUM: &[&str] = &[
    "injury",
    "injured",
    "hurt",
    "pain",
    "broken",
    "theft",
    "robbery",
    "burglary",
    "vandalism",
    "power outage",
    "water leak",
    "minor accident",
    "medical",
    "ambulance",
    "emergency",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateConfidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineEstimate {
    pub severity: Severity,
    pub score: u8,
    pub confidence: EstimateConfidence,
    pub matched_keywords: Vec<String>,
    pub is_offline_estimate: bool,
    pub disclaimer: String,
}

fn matches<'a>(text: &'a str, table: &'a [&'static str]) -> impl Iterator<Item = &'static str> + 'a {
    table.iter().copied().filter(move |keyword| text.contains(keyword))
}

/// Preliminary estimate for a queued report; `reported` is the reporter's own severity pick.
pub fn estimate_offline(
    kind: IncidentType,
    description: &str,
    reported: Option<Severity>,
) -> OfflineEstimate {
    let text = description.to_lowercase();
    let critical = matches(&text, OFFLINE_CRITICAL).count();
    let high = matches(&text, OFFLINE_HIGH).count();
    let medium = matches(&text, OFFLINE_MEDIUM).count();

    let mut score = critical * 30 + high * 15 + medium * 5;
    score += match kind {
        IncidentType::Fire | IncidentType::Flood => 20,
        IncidentType::Medical | IncidentType::Accident => 10,
        IncidentType::Police | IncidentType::Other => 0,
    };
    score += match reported {
        Some(Severity::Critical) => 25,
        Some(Severity::High) => 15,
        _ => 0,
    };
    let score = u8::try_from(score.min(100)).unwrap_or(100);

    let severity = if score >= 70 || critical > 0 {
        Severity::Critical
    } else if score >= 40 || high > 0 {
        Severity::High
    } else if score >= 20 {
        Severity::Medium
    } else {
        Severity::Low
    };

    let confidence = match score {
        51.. => EstimateConfidence::High,
        26..=50 => EstimateConfidence::Medium,
        _ => EstimateConfidence::Low,
    };

    let matched_keywords = matches(&text, OFFLINE_CRITICAL)
        .chain(matches(&text, OFFLINE_HIGH))
        .take(MATCHED_KEYWORD_LIMIT)
        .map(str::to_string)
        .collect();

    OfflineEstimate {
        severity,
        score,
        confidence,
        matched_keywords,
        is_offline_estimate: true,
        disclaimer: OFFLINE_DISCLAIMER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_critical_word_forces_critical() {
        let estimate = estimate_offline(IncidentType::Other, "Tornado spotted", None);
        assert_eq!(estimate.severity, Severity::Critical);
        assert_eq!(estimate.score, 30);
        assert_eq!(estimate.confidence, EstimateConfidence::Medium);
        assert!(estimate.is_offline_estimate);
    }

    #[test]
    fn type_and_reported_severity_add_to_the_score() {
        let estimate = estimate_offline(IncidentType::Medical, "", Some(Severity::High));
        assert_eq!(estimate.score, 25);
        assert_eq!(estimate.severity, Severity::Medium);

        let quiet = estimate_offline(IncidentType::Police, "noise", Some(Severity::Low));
        assert_eq!(quiet.score, 0);
        assert_eq!(quiet.severity, Severity::Low);
        assert_eq!(quiet.confidence, EstimateConfidence::Low);
    }

    #[test]
    fn score_is_clamped_and_keywords_capped() {
        let estimate = estimate_offline(
            IncidentType::Fire,
            "explosion bomb hostage tsunami tornado fire blood",
            Some(Severity::Critical),
        );
        assert_eq!(estimate.score, 100);
        assert_eq!(estimate.confidence, EstimateConfidence::High);
        assert_eq!(
            estimate.matched_keywords,
            vec!["explosion", "bomb", "hostage", "tsunami", "tornado"]
        );
    }
}
