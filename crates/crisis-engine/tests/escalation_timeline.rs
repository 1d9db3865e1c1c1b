use chrono::{DateTime, Duration, TimeZone, Utc};
use crisis_engine::coordination::{
    escalation_alerts, evaluate, timeline, AlertUrgency, IncidentRecord, IncidentStatus,
    LevelStatus,
};
use crisis_engine::triage::{IncidentType, Severity};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 18, 0, 0)
        .single()
        .expect("valid evaluation instant")
}

fn incident(id: &str, severity: Severity, minutes_ago: i64) -> IncidentRecord {
    IncidentRecord::new(id, IncidentType::Fire)
        .with_severity(severity)
        .created(now() - Duration::minutes(minutes_ago))
}

#[test]
fn high_severity_incident_climbs_on_schedule() {
    let state = evaluate(&incident("inc-1", Severity::High, 9), now());

    assert_eq!(state.current_level, 2);
    assert_eq!(state.elapsed_minutes, 9);
    assert!(!state.paused);
    assert!(!state.needs_immediate_attention);

    let next = state.next_escalation.expect("level 3 still ahead");
    assert_eq!(next.level, 3);
    assert_eq!(next.name, "Supervisor Alert");
    assert_eq!(next.in_minutes, 1);
}

#[test]
fn critical_incidents_need_attention_from_level_three() {
    let state = evaluate(&incident("inc-2", Severity::Critical, 6), now());
    assert_eq!(state.current_level, 3);
    assert!(state.needs_immediate_attention);

    let view = timeline(&incident("inc-2", Severity::Critical, 6), now());
    // (3 * 20 + 6) * 1.5
    assert_eq!(view.urgency_score, 99);
    assert_eq!(
        view.current_level_info.map(|info| info.name),
        Some("Supervisor Alert")
    );
}

#[test]
fn missing_severity_and_creation_time_fall_back_to_medium_at_zero() {
    let record = IncidentRecord::new("inc-3", IncidentType::Medical);
    let state = evaluate(&record, now());

    assert_eq!(state.severity, Severity::Medium);
    assert_eq!(state.elapsed_minutes, 0);
    assert_eq!(state.current_level, 1);
    assert_eq!(
        state.next_escalation.map(|next| next.in_minutes),
        Some(10)
    );
}

#[test]
fn creation_in_the_future_counts_as_zero_elapsed() {
    let state = evaluate(&incident("inc-4", Severity::Low, -30), now());
    assert_eq!(state.elapsed_minutes, 0);
    assert_eq!(state.current_level, 1);
}

#[test]
fn assigned_response_holds_back_one_level_past_its_own() {
    let within = incident("inc-5", Severity::Medium, 15).with_status(IncidentStatus::Assigned);
    let state = evaluate(&within, now());
    assert_eq!(state.current_level, 2);
    assert!(state.paused);
    assert_eq!(state.pause_level, Some(1));
    assert_eq!(
        state.pause_reason.as_deref(),
        Some("Response in progress (assigned)")
    );

    let beyond = incident("inc-5", Severity::Medium, 25).with_status(IncidentStatus::Assigned);
    let state = evaluate(&beyond, now());
    assert_eq!(state.current_level, 3);
    assert!(!state.paused);
    assert!(state.needs_immediate_attention);
}

#[test]
fn paused_level_is_marked_on_the_timeline() {
    let record = incident("inc-6", Severity::Medium, 40).with_status(IncidentStatus::InProgress);
    let view = timeline(&record, now());

    assert_eq!(view.state.current_level, 4);
    assert!(view.state.paused);
    assert!(view.state.needs_immediate_attention);

    let statuses: Vec<LevelStatus> = view.levels.iter().map(|entry| entry.status).collect();
    assert_eq!(
        statuses,
        vec![
            LevelStatus::Reached,
            LevelStatus::Reached,
            LevelStatus::Reached,
            LevelStatus::Paused,
            LevelStatus::Pending,
        ]
    );
    assert_eq!(view.levels[4].minutes_until, Some(20));
}

#[test]
fn timeline_reports_minutes_around_each_threshold() {
    let view = timeline(&incident("inc-7", Severity::High, 9), now());

    assert_eq!(view.levels.len(), 5);
    assert_eq!(view.levels[0].minutes_since_reached, Some(9));
    assert_eq!(view.levels[1].minutes_since_reached, Some(4));
    assert!(view.levels[1].current);
    assert_eq!(view.levels[2].minutes_until, Some(1));
    assert_eq!(view.levels[2].minutes_since_reached, None);
    // (2 * 20 + 9) * 1.2 = 58.8
    assert_eq!(view.urgency_score, 59);
    assert_eq!(view.actions[0], "Alert team lead");
}

#[test]
fn resolved_incidents_stop_escalating() {
    let record = incident("inc-8", Severity::Critical, 90).with_status(IncidentStatus::Resolved);
    let view = timeline(&record, now());

    assert_eq!(view.state.current_level, 0);
    assert!(view.state.paused);
    assert_eq!(view.state.pause_reason.as_deref(), Some("Incident resolved"));
    assert_eq!(view.state.elapsed_minutes, 90);
    assert_eq!(view.state.next_escalation, None);
    assert!(!view.state.needs_immediate_attention);
    assert_eq!(view.urgency_score, 0);
    assert!(view.actions.is_empty());
    assert!(view.current_level_info.is_none());
}

#[test]
fn repeated_evaluation_at_the_same_instant_agrees() {
    let record = incident("inc-9", Severity::High, 17);
    assert_eq!(evaluate(&record, now()), evaluate(&record, now()));
}

#[test]
fn alerts_list_unpaused_incidents_from_level_three_highest_first() {
    let incidents = vec![
        incident("medium-25", Severity::Medium, 25),
        incident("critical-13", Severity::Critical, 13),
        incident("high-16", Severity::High, 16),
        incident("low-10", Severity::Low, 10),
        incident("paused-40", Severity::Medium, 40).with_status(IncidentStatus::InProgress),
        incident("high-12", Severity::High, 12),
        incident("closed", Severity::Critical, 60).with_status(IncidentStatus::Cancelled),
    ];

    let alerts = escalation_alerts(&incidents, now());
    let ids: Vec<&str> = alerts.iter().map(|alert| alert.incident_id.as_str()).collect();
    assert_eq!(ids, vec!["critical-13", "high-16", "medium-25", "high-12"]);

    assert_eq!(alerts[0].level, 5);
    assert_eq!(alerts[0].level_name, "Emergency Director");
    assert_eq!(alerts[0].message, "fire incident escalated to Level 5");
    assert_eq!(alerts[0].urgency, AlertUrgency::Critical);
    assert_eq!(alerts[2].urgency, AlertUrgency::Critical);
    assert_eq!(alerts[3].urgency, AlertUrgency::High);
}

#[test]
fn level_never_drops_as_time_passes() {
    for severity in Severity::ordered() {
        let mut previous = 0;
        for minutes in 0..=180 {
            let state = evaluate(&incident("inc-m", severity, minutes), now());
            assert!(state.current_level >= previous, "{severity} at {minutes} min");
            if let Some(next) = &state.next_escalation {
                assert!(next.in_minutes > 0);
                assert_eq!(next.level, state.current_level + 1);
            }
            previous = state.current_level;
        }
        assert_eq!(previous, 5);
    }
}
