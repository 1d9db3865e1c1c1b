//! Time-based escalation of unresolved incidents.
//!
//! Every function takes the evaluation instant explicitly, so repeated polls
//! over the same incident and instant always agree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::IncidentRecord;
use crate::triage::domain::{IncidentType, Severity};

pub const MAX_LEVEL: u8 = 5;
const UNATTENDED_MINUTES: i64 = 20;
const URGENCY_ELAPSED_CAP: i64 = 30;
const ALERT_LEVEL: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationLevel {
    pub level: u8,
    pub name: &'static str,
    pub role: &'static str,
    pub description: &'static str,
}

pub const ESCALATION_LEVELS: [EscalationLevel; 5] = [
    EscalationLevel {
        level: 1,
        name: "Initial Response",
        role: "volunteer",
        description: "Volunteer responders notified",
    },
    EscalationLevel {
        level: 2,
        name: "Team Response",
        role: "team_lead",
        description: "Team lead alerted, additional resources requested",
    },
    EscalationLevel {
        level: 3,
        name: "Supervisor Alert",
        role: "supervisor",
        description: "Supervisor notified, priority elevated",
    },
    EscalationLevel {
        level: 4,
        name: "Command Center",
        role: "agency",
        description: "Agency command center taking over",
    },
    EscalationLevel {
        level: 5,
        name: "Emergency Director",
        role: "director",
        description: "Emergency director intervention",
    },
];

/// Minutes after creation at which levels 1..=5 are reached.
pub const fn thresholds(severity: Severity) -> [i64; 5] {
    match severity {
        Severity::Critical => [0, 3, 5, 8, 12],
        Severity::High => [0, 5, 10, 15, 25],
        Severity::Medium => [0, 10, 20, 35, 60],
        Severity::Low => [0, 15, 30, 60, 120],
    }
}

pub fn level_info(level: u8) -> Option<&'static EscalationLevel> {
    ESCALATION_LEVELS.iter().find(|info| info.level == level)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextEscalation {
    pub level: u8,
    pub name: String,
    pub in_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationState {
    pub current_level: u8,
    pub paused: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_reason: Option<String>,
    pub elapsed_minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_escalation: Option<NextEscalation>,
    pub needs_immediate_attention: bool,
    pub severity: Severity,
}

/// Whole minutes since creation, never negative; 0 when the creation instant is unknown.
pub fn elapsed_minutes(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    created_at
        .map(|created| (now - created).num_seconds().div_euclid(60).max(0))
        .unwrap_or(0)
}

/// Highest level whose threshold has been reached, never below 1.
pub fn level_for(severity: Severity, elapsed: i64) -> u8 {
    let limits = thresholds(severity);
    (1..=MAX_LEVEL)
        .rev()
        .find(|level| elapsed >= limits[usize::from(*level - 1)])
        .unwrap_or(1)
}

fn next_escalation(severity: Severity, elapsed: i64) -> Option<NextEscalation> {
    let limits = thresholds(severity);
    ESCALATION_LEVELS
        .iter()
        .zip(limits)
        .find(|(_, threshold)| elapsed < *threshold)
        .map(|(info, threshold)| NextEscalation {
            level: info.level,
            name: info.name.to_string(),
            in_minutes: threshold - elapsed,
        })
}

/// Evaluate the escalation state of one incident at `now`.
pub fn evaluate(incident: &IncidentRecord, now: DateTime<Utc>) -> EscalationState {
    let severity = incident.severity_or_medium();
    let elapsed = elapsed_minutes(incident.created_at(), now);

    if incident.status.is_terminal() {
        return EscalationState {
            current_level: 0,
            paused: true,
            pause_reason: Some("Incident resolved".to_string()),
            elapsed_minutes: elapsed,
            pause_level: None,
            next_escalation: None,
            needs_immediate_attention: false,
            severity,
        };
    }

    let current_level = level_for(severity, elapsed);
    let pause_level = incident.status.pause_level();
    let paused = pause_level > 0 && current_level <= pause_level + 1;
    let pause_reason =
        paused.then(|| format!("Response in progress ({})", incident.status.label()));

    let needs_immediate_attention = (severity == Severity::Critical && current_level >= 3)
        || current_level >= 4
        || (!paused && elapsed > UNATTENDED_MINUTES);

    EscalationState {
        current_level,
        paused,
        pause_reason,
        elapsed_minutes: elapsed,
        pause_level: (pause_level > 0).then_some(pause_level),
        next_escalation: next_escalation(severity, elapsed),
        needs_immediate_attention,
        severity,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelStatus {
    Reached,
    Pending,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub level: u8,
    pub name: &'static str,
    pub role: &'static str,
    pub description: &'static str,
    pub threshold_minutes: i64,
    pub reached: bool,
    pub current: bool,
    pub paused: bool,
    pub status: LevelStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_since_reached: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_until: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationTimeline {
    #[serde(flatten)]
    pub state: EscalationState,
    pub levels: Vec<TimelineEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_level_info: Option<EscalationLevel>,
    pub urgency_score: u8,
    pub actions: Vec<&'static str>,
}

/// Per-level view of an incident's escalation at `now`.
pub fn timeline(incident: &IncidentRecord, now: DateTime<Utc>) -> EscalationTimeline {
    let state = evaluate(incident, now);
    let limits = thresholds(state.severity);
    let elapsed = state.elapsed_minutes;

    let levels = ESCALATION_LEVELS
        .iter()
        .zip(limits)
        .map(|(info, threshold)| {
            let reached = elapsed >= threshold;
            let current = info.level == state.current_level;
            let paused = state.paused && current;
            let status = if paused {
                LevelStatus::Paused
            } else if reached {
                LevelStatus::Reached
            } else {
                LevelStatus::Pending
            };
            TimelineEntry {
                level: info.level,
                name: info.name,
                role: info.role,
                description: info.description,
                threshold_minutes: threshold,
                reached,
                current,
                paused,
                status,
                minutes_since_reached: reached.then(|| (elapsed - threshold).max(0)),
                minutes_until: (!reached).then(|| threshold - elapsed),
            }
        })
        .collect();

    let urgency = if incident.status.is_terminal() {
        0
    } else {
        urgency_score(state.current_level, elapsed, state.severity)
    };

    EscalationTimeline {
        current_level_info: level_info(state.current_level).copied(),
        urgency_score: urgency,
        actions: actions(state.current_level).to_vec(),
        levels,
        state,
    }
}

/// `min(100, round((level * 20 + min(elapsed, 30)) * severity weight))`.
pub fn urgency_score(level: u8, elapsed: i64, severity: Severity) -> u8 {
    let weight = match severity {
        Severity::Critical => 1.5,
        Severity::High => 1.2,
        Severity::Medium => 1.0,
        Severity::Low => 0.7,
    };
    let raw = i64::from(level) * 20 + elapsed.clamp(0, URGENCY_ELAPSED_CAP);
    let weighted = (raw as f64 * weight).round();
    weighted.min(100.0) as u8
}

pub fn actions(level: u8) -> &'static [&'static str] {
    match level {
        1 => &[
            "Notify nearby volunteers",
            "Send push notification",
            "Display on dashboard",
        ],
        2 => &[
            "Alert team lead",
            "Request additional volunteers",
            "Increase map visibility",
        ],
        3 => &[
            "Notify supervisor",
            "Trigger agency alert",
            "Prepare resource dispatch",
        ],
        4 => &[
            "Command center takeover",
            "Dispatch emergency resources",
            "Open direct communication channel",
        ],
        5 => &[
            "Emergency director notified",
            "All available resources mobilized",
            "Media blackout protocol available",
            "Government liaison alerted",
        ],
        _ => &[],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertUrgency {
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationAlert {
    pub incident_id: String,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub severity: Severity,
    pub level: u8,
    pub level_name: &'static str,
    pub elapsed_minutes: i64,
    pub message: String,
    pub urgency: AlertUrgency,
}

/// Alerts for incidents at level 3 or above whose escalation is not paused,
/// highest level first (input order kept within a level).
pub fn escalation_alerts(incidents: &[IncidentRecord], now: DateTime<Utc>) -> Vec<EscalationAlert> {
    let mut alerts: Vec<EscalationAlert> = incidents
        .iter()
        .filter_map(|incident| {
            let state = evaluate(incident, now);
            if state.current_level < ALERT_LEVEL || state.paused {
                return None;
            }
            let info = level_info(state.current_level)?;
            Some(EscalationAlert {
                incident_id: incident.id.clone(),
                incident_type: incident.incident_type,
                severity: state.severity,
                level: state.current_level,
                level_name: info.name,
                elapsed_minutes: state.elapsed_minutes,
                message: format!(
                    "{} incident escalated to Level {}",
                    incident.incident_type, state.current_level
                ),
                urgency: if state.needs_immediate_attention {
                    AlertUrgency::Critical
                } else {
                    AlertUrgency::High
                },
            })
        })
        .collect();

    alerts.sort_by(|a, b| b.level.cmp(&a.level));
    alerts
}
