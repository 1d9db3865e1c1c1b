//! What-if response simulation: estimated arrival time and outcome odds for a
//! chosen mix of responding units, plus preset scenarios to compare.

use serde::{Deserialize, Serialize};

use super::domain::{deserialize_lenient_severity, IncidentType, Severity};
use super::resources::ResourcePriority;

const MINIMUM_RESPONSE_MINUTES: f64 = 2.0;
const MINUTES_PER_MILE: f64 = 0.5;
const OPTIMAL_RESPONSE_BONUS: f64 = 5.0;
const SURVIVAL_CEILING: f64 = 99.0;
const SURVIVAL_FLOOR: f64 = 5.0;
const DELAYED_PRESET_MINUTES: f64 = 5.0;
const AMBULANCE_BOOST_CAP: u32 = 2;
const FIRE_REDUCTION_CAP: u32 = 3;

/// Dispatch and outcome characteristics of one kind of responding unit.
struct Responder {
    base_minutes: f64,
    response_reduction: f64,
    outcome_boost: f64,
}

const AMBULANCE: Responder = Responder {
    base_minutes: 7.0,
    response_reduction: 0.0,
    outcome_boost: 15.0,
};
const FIRE: Responder = Responder {
    base_minutes: 6.0,
    response_reduction: 1.0,
    outcome_boost: 10.0,
};
const POLICE: Responder = Responder {
    base_minutes: 5.0,
    response_reduction: 0.0,
    outcome_boost: 5.0,
};
const RESCUE: Responder = Responder {
    base_minutes: 8.0,
    response_reduction: 2.0,
    outcome_boost: 20.0,
};
const HELICOPTER: Responder = Responder {
    base_minutes: 12.0,
    response_reduction: 5.0,
    outcome_boost: 25.0,
};

fn primary_responder(kind: IncidentType) -> &'static Responder {
    match kind {
        IncidentType::Fire => &FIRE,
        IncidentType::Flood => &RESCUE,
        IncidentType::Police => &POLICE,
        IncidentType::Medical | IncidentType::Accident | IncidentType::Other => &AMBULANCE,
    }
}

/// How quickly outcomes degrade once a response runs late.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OutcomeCurve {
    critical_threshold: f64,
    survival_base: f64,
    decay_rate: f64,
    optimal_time: f64,
}

fn outcome_curve(kind: IncidentType) -> OutcomeCurve {
    let (critical_threshold, survival_base, decay_rate, optimal_time) = match kind {
        IncidentType::Fire => (5.0, 95.0, 8.0, 4.0),
        IncidentType::Accident => (10.0, 85.0, 5.0, 6.0),
        IncidentType::Flood => (15.0, 80.0, 3.0, 10.0),
        IncidentType::Police => (8.0, 75.0, 4.0, 5.0),
        IncidentType::Medical | IncidentType::Other => (8.0, 90.0, 10.0, 4.0),
    };
    OutcomeCurve {
        critical_threshold,
        survival_base,
        decay_rate,
        optimal_time,
    }
}

fn time_modifier(severity: Option<Severity>) -> f64 {
    match severity {
        Some(Severity::Critical) => 0.8,
        Some(Severity::High) => 0.9,
        Some(Severity::Medium) | None => 1.0,
        Some(Severity::Low) => 1.2,
    }
}

fn survival_penalty(severity: Option<Severity>) -> f64 {
    match severity {
        Some(Severity::Critical) => 20.0,
        Some(Severity::High) => 10.0,
        Some(Severity::Medium) | None => 5.0,
        Some(Severity::Low) => 0.0,
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn positive_or_zero(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Incident facts the simulation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedIncident {
    #[serde(rename = "type", default)]
    pub incident_type: IncidentType,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_severity",
        skip_serializing_if = "Option::is_none"
    )]
    pub severity: Option<Severity>,
    /// Travel distance to the scene.
    #[serde(default, alias = "distance", skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
}

impl SimulatedIncident {
    pub fn new(incident_type: IncidentType, severity: Option<Severity>) -> Self {
        Self {
            incident_type,
            severity,
            distance_miles: None,
        }
    }

    pub fn at_distance(mut self, miles: f64) -> Self {
        self.distance_miles = Some(miles);
        self
    }
}

/// Units committed in one scenario. Omitted fields mean one ambulance and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseConfig {
    pub ambulance_count: u32,
    pub fire_count: u32,
    pub police_count: u32,
    pub rescue_count: u32,
    pub helicopter_available: bool,
    pub delay_minutes: f64,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            ambulance_count: 1,
            fire_count: 0,
            police_count: 0,
            rescue_count: 0,
            helicopter_available: false,
            delay_minutes: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedUnits {
    pub ambulance: u32,
    pub fire: u32,
    pub police: u32,
    pub rescue: u32,
    pub helicopter: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeRisk {
    Low,
    Moderate,
    High,
    Critical,
}

impl OutcomeRisk {
    pub fn from_survival(survival: f64) -> Self {
        if survival < 40.0 {
            Self::Critical
        } else if survival < 60.0 {
            Self::High
        } else if survival < 80.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRecommendation {
    pub priority: ResourcePriority,
    pub action: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub response_time: f64,
    pub survival_probability: u8,
    pub risk_level: OutcomeRisk,
    pub critical_threshold: f64,
    pub optimal_time: f64,
    pub resources_deployed: DeployedUnits,
    pub delay_applied: f64,
    pub recommendations: Vec<SimulationRecommendation>,
}

/// Arrival estimate for the incident's primary responder, before any extra units.
pub fn base_response_minutes(incident: &SimulatedIncident) -> f64 {
    let mut minutes =
        primary_responder(incident.incident_type).base_minutes * time_modifier(incident.severity);
    if let Some(distance) = incident.distance_miles {
        minutes += positive_or_zero(distance) * MINUTES_PER_MILE;
    }
    round_tenth(minutes)
}

/// Run one scenario against an incident.
pub fn simulate(incident: &SimulatedIncident, config: &ResponseConfig) -> SimulationResult {
    let curve = outcome_curve(incident.incident_type);
    let delay = positive_or_zero(config.delay_minutes);

    let mut reduction = 0.0;
    let mut boost = 0.0;
    if config.ambulance_count > 0 {
        reduction += AMBULANCE.response_reduction;
        let counted = config.ambulance_count.min(AMBULANCE_BOOST_CAP);
        boost += AMBULANCE.outcome_boost * f64::from(counted);
    }
    if config.fire_count > 0 {
        let counted = config.fire_count.min(FIRE_REDUCTION_CAP);
        reduction += FIRE.response_reduction * f64::from(counted);
        boost += FIRE.outcome_boost;
    }
    if config.police_count > 0 {
        reduction += POLICE.response_reduction;
        boost += POLICE.outcome_boost;
    }
    if config.rescue_count > 0 {
        reduction += RESCUE.response_reduction;
        boost += RESCUE.outcome_boost;
    }
    if config.helicopter_available {
        reduction += HELICOPTER.response_reduction;
        boost += HELICOPTER.outcome_boost;
    }

    let response =
        (base_response_minutes(incident) - reduction + delay).max(MINIMUM_RESPONSE_MINUTES);

    let mut survival = curve.survival_base;
    if response > curve.critical_threshold {
        survival -= (response - curve.critical_threshold) * curve.decay_rate;
    } else if response <= curve.optimal_time {
        survival += OPTIMAL_RESPONSE_BONUS;
    }
    survival = (survival + boost * 0.5).clamp(SURVIVAL_FLOOR, SURVIVAL_CEILING);
    survival = (survival - survival_penalty(incident.severity)).max(SURVIVAL_FLOOR);

    SimulationResult {
        response_time: round_tenth(response),
        survival_probability: survival.round() as u8,
        risk_level: OutcomeRisk::from_survival(survival),
        critical_threshold: curve.critical_threshold,
        optimal_time: curve.optimal_time,
        resources_deployed: DeployedUnits {
            ambulance: config.ambulance_count,
            fire: config.fire_count,
            police: config.police_count,
            rescue: config.rescue_count,
            helicopter: config.helicopter_available,
        },
        delay_applied: delay,
        recommendations: recommendations(response, survival, &curve, config, delay),
    }
}

fn recommendation(
    priority: ResourcePriority,
    action: String,
    suggestion: &str,
) -> SimulationRecommendation {
    SimulationRecommendation {
        priority,
        action,
        suggestion: suggestion.to_string(),
    }
}

fn recommendations(
    response: f64,
    survival: f64,
    curve: &OutcomeCurve,
    config: &ResponseConfig,
    delay: f64,
) -> Vec<SimulationRecommendation> {
    let mut items = Vec::new();
    if response > curve.critical_threshold {
        items.push(recommendation(
            ResourcePriority::Critical,
            "Response time exceeds critical threshold".to_string(),
            "Add helicopter or closer staging resources",
        ));
    }
    if survival < 60.0 && !config.helicopter_available {
        items.push(recommendation(
            ResourcePriority::High,
            "Low survival probability detected".to_string(),
            "Request air medical transport",
        ));
    }
    if config.ambulance_count < 2 && survival < 70.0 {
        items.push(recommendation(
            ResourcePriority::High,
            "Single ambulance may be insufficient".to_string(),
            "Dispatch backup medical unit",
        ));
    }
    if response > curve.optimal_time && delay > 0.0 {
        let recovered = (delay * curve.decay_rate).round();
        items.push(recommendation(
            ResourcePriority::Medium,
            format!("{delay} minute delay detected"),
            &format!("Eliminate delay to improve outcomes by ~{recovered}%"),
        ));
    }
    if items.is_empty() {
        items.push(recommendation(
            ResourcePriority::Low,
            "Resource allocation is optimal".to_string(),
            "Continue with current deployment",
        ));
    }
    items
}

/// A named resource configuration to evaluate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub config: ResponseConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    pub scenario_id: usize,
    pub name: String,
    #[serde(flatten)]
    pub result: SimulationResult,
}

/// Simulate every scenario in order; unnamed ones are labelled by position.
pub fn compare_scenarios(
    incident: &SimulatedIncident,
    scenarios: &[Scenario],
) -> Vec<ScenarioOutcome> {
    scenarios
        .iter()
        .enumerate()
        .map(|(index, scenario)| ScenarioOutcome {
            scenario_id: index + 1,
            name: scenario
                .name
                .clone()
                .unwrap_or_else(|| format!("Scenario {}", index + 1)),
            result: simulate(incident, &scenario.config),
        })
        .collect()
}

fn preset(name: &str, description: &str, config: ResponseConfig) -> Scenario {
    Scenario {
        name: Some(name.to_string()),
        description: Some(description.to_string()),
        config,
    }
}

/// Five stock configurations from a bare minimum to full air support.
pub fn scenario_presets(incident: &SimulatedIncident) -> Vec<Scenario> {
    let kind = incident.incident_type;
    let is = |candidate: IncidentType| u32::from(kind == candidate);
    let idle = ResponseConfig {
        ambulance_count: 0,
        ..ResponseConfig::default()
    };

    vec![
        preset(
            "Minimum Response",
            "Basic single-unit response",
            ResponseConfig {
                ambulance_count: is(IncidentType::Medical) + is(IncidentType::Accident),
                fire_count: is(IncidentType::Fire),
                police_count: is(IncidentType::Police),
                ..idle
            },
        ),
        preset(
            "Standard Response",
            "Recommended resource allocation",
            ResponseConfig {
                ambulance_count: 1,
                fire_count: 2 * is(IncidentType::Fire),
                police_count: is(IncidentType::Police) + is(IncidentType::Accident),
                ..idle
            },
        ),
        preset(
            "Enhanced Response",
            "Multiple units with backup",
            ResponseConfig {
                ambulance_count: 2,
                fire_count: if kind == IncidentType::Fire { 3 } else { 1 },
                police_count: 1,
                rescue_count: u32::from(incident.severity == Some(Severity::Critical)),
                ..idle
            },
        ),
        preset(
            "Maximum Response",
            "All available resources including air support",
            ResponseConfig {
                ambulance_count: 2,
                fire_count: 2,
                police_count: 2,
                rescue_count: 1,
                helicopter_available: true,
                delay_minutes: 0.0,
            },
        ),
        preset(
            "Delayed Response (5 min)",
            "Standard response with 5-minute delay",
            ResponseConfig {
                ambulance_count: 1,
                fire_count: 2 * is(IncidentType::Fire),
                delay_minutes: DELAYED_PRESET_MINUTES,
                ..idle
            },
        ),
    ]
}
