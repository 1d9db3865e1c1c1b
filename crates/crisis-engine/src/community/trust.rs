use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::triage::resources::ResourcePriority;

const BASE_SCORE: f64 = 30.0;
const PROFILE_BONUS: f64 = 10.0;
const IDENTITY_BONUS: f64 = 25.0;
const MISSION_TARGET: u32 = 5;
const CONSISTENCY_SCORE_TARGET: f64 = 60.0;

/// Activity counters for one reporter or volunteer. Missing fields read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrustActivity {
    pub incidents_reported: u32,
    pub incidents_verified: u32,
    pub missions_completed: u32,
    pub on_time_responses: u32,
    pub positive_feedback: u32,
    pub account_age_days: u32,
    pub profile_complete: bool,
    pub verified_identity: bool,
    pub false_reports: u32,
    pub abandoned_missions: u32,
    pub late_responses: u32,
    pub negative_feedback: u32,
    pub reported_by_others: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLevel {
    Flagged,
    New,
    Standard,
    Verified,
    Trusted,
}

impl TrustLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Trusted
        } else if score >= 60.0 {
            Self::Verified
        } else if score >= 40.0 {
            Self::Standard
        } else if score >= 20.0 {
            Self::New
        } else {
            Self::Flagged
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Trusted => "Trusted",
            Self::Verified => "Verified",
            Self::Standard => "Standard",
            Self::New => "New User",
            Self::Flagged => "Under Review",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustFactor {
    pub name: String,
    pub value: String,
    pub impact: f64,
    pub positive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustStats {
    pub reliability: u8,
    pub response_rate: u8,
    pub total_missions: u32,
    pub total_reports: u32,
    pub verification_rate: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustRecommendation {
    pub action: String,
    pub impact: String,
    pub priority: ResourcePriority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustAssessment {
    pub score: u8,
    pub level: TrustLevel,
    pub level_label: String,
    pub factors: Vec<TrustFactor>,
    pub stats: TrustStats,
    pub recommendations: Vec<TrustRecommendation>,
}

/// Weighted counter with a cap (positive weights) or floor (negative weights).
struct FactorRule {
    name: &'static str,
    weight: f64,
    limit: f64,
}

impl FactorRule {
    fn impact(&self, count: u32) -> f64 {
        let raw = f64::from(count) * self.weight;
        if self.weight >= 0.0 {
            raw.min(self.limit)
        } else {
            raw.max(self.limit)
        }
    }
}

const REPORTS: FactorRule = FactorRule {
    name: "Reports Submitted",
    weight: 2.0,
    limit: 50.0,
};
const VERIFIED_REPORTS: FactorRule = FactorRule {
    name: "Verified Reports",
    weight: 5.0,
    limit: 100.0,
};
const MISSIONS: FactorRule = FactorRule {
    name: "Missions Completed",
    weight: 10.0,
    limit: 200.0,
};
const ON_TIME: FactorRule = FactorRule {
    name: "On-Time Responses",
    weight: 3.0,
    limit: 60.0,
};
const POSITIVE_FEEDBACK: FactorRule = FactorRule {
    name: "Positive Feedback",
    weight: 4.0,
    limit: 80.0,
};
const ACCOUNT_AGE: FactorRule = FactorRule {
    name: "Account Age",
    weight: 0.5,
    limit: 30.0,
};
const FALSE_REPORTS: FactorRule = FactorRule {
    name: "False Reports",
    weight: -20.0,
    limit: -100.0,
};
const ABANDONED: FactorRule = FactorRule {
    name: "Abandoned Missions",
    weight: -15.0,
    limit: -75.0,
};
const LATE: FactorRule = FactorRule {
    name: "Late Responses",
    weight: -5.0,
    limit: -25.0,
};
const NEGATIVE_FEEDBACK: FactorRule = FactorRule {
    name: "Negative Feedback",
    weight: -10.0,
    limit: -50.0,
};
const REPORTED_BY_OTHERS: FactorRule = FactorRule {
    name: "Reported by Others",
    weight: -25.0,
    limit: -100.0,
};

fn percent(part: u32, whole: u64) -> Option<u8> {
    (whole > 0).then(|| (f64::from(part) / whole as f64 * 100.0).round().min(100.0) as u8)
}

fn counted_factor(rule: &FactorRule, count: u32, display: Option<String>) -> Option<TrustFactor> {
    let impact = rule.impact(count);
    (impact != 0.0).then(|| TrustFactor {
        name: rule.name.to_string(),
        value: display.unwrap_or_else(|| count.to_string()),
        impact,
        positive: impact > 0.0,
    })
}

fn bonus_factor(enabled: bool, name: &str, bonus: f64) -> Option<TrustFactor> {
    enabled.then(|| TrustFactor {
        name: name.to_string(),
        value: "Yes".to_string(),
        impact: bonus,
        positive: true,
    })
}

/// Score a participant's track record.
pub fn assess_trust(activity: &TrustActivity) -> TrustAssessment {
    let mut factors: Vec<TrustFactor> = [
        counted_factor(&REPORTS, activity.incidents_reported, None),
        counted_factor(&VERIFIED_REPORTS, activity.incidents_verified, None),
        counted_factor(&MISSIONS, activity.missions_completed, None),
        counted_factor(&ON_TIME, activity.on_time_responses, None),
        counted_factor(&POSITIVE_FEEDBACK, activity.positive_feedback, None),
        counted_factor(
            &ACCOUNT_AGE,
            activity.account_age_days,
            Some(format!("{} days", activity.account_age_days)),
        ),
        bonus_factor(activity.profile_complete, "Complete Profile", PROFILE_BONUS),
        bonus_factor(activity.verified_identity, "Verified Identity", IDENTITY_BONUS),
        counted_factor(&FALSE_REPORTS, activity.false_reports, None),
        counted_factor(&ABANDONED, activity.abandoned_missions, None),
        counted_factor(&LATE, activity.late_responses, None),
        counted_factor(&NEGATIVE_FEEDBACK, activity.negative_feedback, None),
        counted_factor(&REPORTED_BY_OTHERS, activity.reported_by_others, None),
    ]
    .into_iter()
    .flatten()
    .collect();

    let score = (BASE_SCORE + factors.iter().map(|factor| factor.impact).sum::<f64>())
        .clamp(0.0, 100.0);
    factors.sort_by(|a, b| {
        b.impact
            .abs()
            .partial_cmp(&a.impact.abs())
            .unwrap_or(Ordering::Equal)
    });

    let level = TrustLevel::from_score(score);
    let stats = TrustStats {
        reliability: percent(
            activity.missions_completed,
            u64::from(activity.missions_completed) + u64::from(activity.abandoned_missions),
        )
        .unwrap_or(100),
        response_rate: percent(
            activity.on_time_responses,
            u64::from(activity.on_time_responses) + u64::from(activity.late_responses),
        )
        .unwrap_or(100),
        total_missions: activity.missions_completed,
        total_reports: activity.incidents_reported,
        verification_rate: percent(
            activity.incidents_verified,
            u64::from(activity.incidents_reported),
        )
        .unwrap_or(0),
    };

    TrustAssessment {
        score: score.round() as u8,
        level,
        level_label: level.label().to_string(),
        factors,
        stats,
        recommendations: recommendations(activity, score),
    }
}

fn recommendation(action: &str, impact: &str, priority: ResourcePriority) -> TrustRecommendation {
    TrustRecommendation {
        action: action.to_string(),
        impact: impact.to_string(),
        priority,
    }
}

fn recommendations(activity: &TrustActivity, score: f64) -> Vec<TrustRecommendation> {
    let mut items = Vec::new();
    if !activity.profile_complete {
        items.push(recommendation(
            "Complete your profile",
            "+10 points",
            ResourcePriority::High,
        ));
    }
    if !activity.verified_identity {
        items.push(recommendation(
            "Verify your identity",
            "+25 points",
            ResourcePriority::High,
        ));
    }
    if activity.missions_completed < MISSION_TARGET {
        items.push(recommendation(
            "Complete more volunteer missions",
            "+10 points per mission",
            ResourcePriority::Medium,
        ));
    }
    if activity.abandoned_missions > 0 {
        items.push(recommendation(
            "Complete missions once accepted",
            "Prevents -15 points penalty",
            ResourcePriority::High,
        ));
    }
    if score < CONSISTENCY_SCORE_TARGET {
        items.push(recommendation(
            "Maintain consistent response times",
            "+3 points per on-time response",
            ResourcePriority::Medium,
        ));
    }
    items
}

/// Actions gated behind a minimum trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustedAction {
    ReportIncident,
    AcceptMission,
    RespondToCritical,
    VerifyReports,
    DispatchResources,
}

impl TrustedAction {
    pub const fn minimum_score(self) -> u8 {
        match self {
            Self::ReportIncident => 0,
            Self::AcceptMission => 20,
            Self::RespondToCritical => 60,
            Self::VerifyReports => 70,
            Self::DispatchResources => 80,
        }
    }
}

pub fn can_perform(score: u8, action: TrustedAction) -> bool {
    score >= action.minimum_score()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newcomer_starts_at_thirty() {
        let assessment = assess_trust(&TrustActivity::default());
        assert_eq!(assessment.score, 30);
        assert_eq!(assessment.level, TrustLevel::New);
        assert!(assessment.factors.is_empty());
        assert_eq!(assessment.stats.reliability, 100);
        assert_eq!(assessment.stats.response_rate, 100);
        assert_eq!(assessment.stats.verification_rate, 0);
        assert_eq!(assessment.recommendations.len(), 4);
    }

    #[test]
    fn seasoned_volunteer_is_trusted_and_factors_sort_by_impact() {
        let activity = TrustActivity {
            incidents_reported: 10,
            incidents_verified: 4,
            missions_completed: 3,
            account_age_days: 15,
            profile_complete: true,
            verified_identity: true,
            late_responses: 1,
            ..TrustActivity::default()
        };
        let assessment = assess_trust(&activity);

        // 30 + 20 + 20 + 30 + 7.5 + 10 + 25 - 5 = 137.5, clamped.
        assert_eq!(assessment.score, 100);
        assert_eq!(assessment.level, TrustLevel::Trusted);
        let names: Vec<&str> = assessment
            .factors
            .iter()
            .map(|factor| factor.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Missions Completed",
                "Verified Identity",
                "Reports Submitted",
                "Verified Reports",
                "Complete Profile",
                "Account Age",
                "Late Responses",
            ]
        );
        assert_eq!(assessment.factors[5].value, "15 days");
        assert_eq!(assessment.stats.response_rate, 0);
        assert_eq!(assessment.stats.verification_rate, 40);
    }

    #[test]
    fn penalties_floor_and_flag_the_account() {
        let activity = TrustActivity {
            false_reports: 9,
            reported_by_others: 1,
            abandoned_missions: 2,
            missions_completed: 2,
            ..TrustActivity::default()
        };
        let assessment = assess_trust(&activity);
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, TrustLevel::Flagged);
        assert_eq!(assessment.level_label, "Under Review");
        assert_eq!(assessment.factors[0].impact, -100.0);
        assert_eq!(assessment.stats.reliability, 50);
        assert!(assessment
            .recommendations
            .iter()
            .any(|item| item.action == "Complete missions once accepted"));
    }

    #[test]
    fn saturated_counters_keep_rates_in_range() {
        let activity = TrustActivity {
            missions_completed: u32::MAX,
            abandoned_missions: 1,
            on_time_responses: u32::MAX,
            late_responses: u32::MAX,
            ..TrustActivity::default()
        };
        let assessment = assess_trust(&activity);
        assert_eq!(assessment.stats.reliability, 100);
        assert_eq!(assessment.stats.response_rate, 50);
        assert_eq!(assessment.stats.total_missions, u32::MAX);
        assert!(assessment.score <= 100);
    }

    #[test]
    fn bonus_factors_rank_ahead_of_equal_penalties() {
        let activity = TrustActivity {
            verified_identity: true,
            reported_by_others: 1,
            ..TrustActivity::default()
        };
        let assessment = assess_trust(&activity);
        assert_eq!(assessment.score, 30);
        let names: Vec<&str> = assessment
            .factors
            .iter()
            .map(|factor| factor.name.as_str())
            .collect();
        assert_eq!(names, vec!["Verified Identity", "Reported by Others"]);
    }

    #[test]
    fn actions_are_gated_by_minimum_score() {
        assert!(can_perform(0, TrustedAction::ReportIncident));
        assert!(!can_perform(19, TrustedAction::AcceptMission));
        assert!(can_perform(60, TrustedAction::RespondToCritical));
        assert!(!can_perform(69, TrustedAction::VerifyReports));
        assert!(can_perform(80, TrustedAction::DispatchResources));
    }
}
