use serde::{Deserialize, Serialize};

use super::super::domain::{Severity, VisualSignal};
use super::SeverityResult;

/// Signals at or below this confidence are ignored.
pub const VISUAL_CONFIDENCE_THRESHOLD: f64 = 0.7;

const HAZARD_LABELS: [&str; 3] = ["fire", "explosion", "smoke"];
const VEHICLE_LABELS: [&str; 3] = ["crash", "wreck", "vehicle"];
const HAZARD_SCORE_FLOOR: u8 = 85;
const VEHICLE_SCORE_FLOOR: u8 = 45;
const ENTRAPMENT_SCORE: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualRule {
    HazardLabel,
    FireEntrapment,
    VehicleLabel,
}

/// Classifier output after the optional visual signal was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AugmentedSeverity {
    pub severity: Severity,
    pub priority_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_rule: Option<VisualRule>,
}

impl AugmentedSeverity {
    fn passthrough(result: &SeverityResult) -> Self {
        Self {
            severity: result.severity,
            priority_score: result.priority_score,
            visual_rule: None,
        }
    }
}

/// Apply a visual-analysis signal on top of the keyword classification.
///
/// Hazard labels raise non-critical results to `high` (score at least 85). A
/// `fire` label combined with "large" or "trapped" in the description then
/// forces `critical`/95 even when the first step already fired. Vehicle labels
/// only lift `low` results to `medium`.
pub fn augment(
    result: &SeverityResult,
    signal: Option<&VisualSignal>,
    description: &str,
) -> AugmentedSeverity {
    let mut augmented = AugmentedSeverity::passthrough(result);
    let Some(signal) = signal.filter(|signal| signal.confidence > VISUAL_CONFIDENCE_THRESHOLD)
    else {
        return augmented;
    };

    let label = signal.label.to_lowercase();
    let description = description.to_lowercase();

    if HAZARD_LABELS.iter().any(|hazard| label.contains(hazard)) {
        if augmented.severity != Severity::Critical {
            augmented.severity = Severity::High;
            augmented.priority_score = augmented.priority_score.max(HAZARD_SCORE_FLOOR);
            augmented.visual_rule = Some(VisualRule::HazardLabel);
        }
        if label.contains("fire")
            && (description.contains("large") || description.contains("trapped"))
        {
            let changed = augmented.severity != Severity::Critical
                || augmented.priority_score != ENTRAPMENT_SCORE;
            augmented.severity = Severity::Critical;
            augmented.priority_score = ENTRAPMENT_SCORE;
            if changed {
                augmented.visual_rule = Some(VisualRule::FireEntrapment);
            }
        }
    } else if VEHICLE_LABELS.iter().any(|vehicle| label.contains(vehicle))
        && augmented.severity == Severity::Low
    {
        augmented.severity = Severity::Medium;
        augmented.priority_score = augmented.priority_score.max(VEHICLE_SCORE_FLOOR);
        augmented.visual_rule = Some(VisualRule::VehicleLabel);
    }

    augmented
}
