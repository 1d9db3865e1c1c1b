use crate::infra::{parse_incident_type, parse_severity, parse_status, DeployedArgs};
use chrono::{Duration, Utc};
use clap::Args;
use crisis_engine::community::{assess_trust, TrustActivity};
use crisis_engine::config::AppConfig;
use crisis_engine::coordination::{
    escalation_alerts, timeline, EscalationTimeline, IncidentCsvImporter, IncidentRecord,
    IncidentStatus, OverloadReport, ResourceCounts, ResourceKind,
};
use crisis_engine::error::AppError;
use crisis_engine::triage::{
    compare_scenarios, explain, scenario_presets, ConfidenceBand, ExplanationTrace,
    IncidentAssessment, IncidentInput, IncidentType, ScenarioOutcome, Severity, SimulatedIncident,
    TriageService, VisualSignal,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Incident type (medical, fire, accident, flood, police, other)
    #[arg(long = "type", value_parser = parse_incident_type)]
    pub(crate) incident_type: IncidentType,
    /// Free-text report description
    #[arg(long, default_value = "")]
    pub(crate) description: String,
    /// Label returned by image analysis
    #[arg(long, requires = "visual_confidence")]
    pub(crate) visual_label: Option<String>,
    /// Confidence of the image-analysis label (0.0 - 1.0)
    #[arg(long, requires = "visual_label")]
    pub(crate) visual_confidence: Option<f64>,
    /// Print the raw JSON payload instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExplainArgs {
    /// Incident type (medical, fire, accident, flood, police, other)
    #[arg(long = "type", value_parser = parse_incident_type)]
    pub(crate) incident_type: IncidentType,
    /// Free-text report description
    #[arg(long, default_value = "")]
    pub(crate) description: String,
    /// Print the raw JSON payload instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct EscalationArgs {
    /// Incident severity (low, medium, high, critical)
    #[arg(long, value_parser = parse_severity, default_value = "medium")]
    pub(crate) severity: Severity,
    /// Incident status (reported, assigned, on_the_way, in_progress, resolved, cancelled)
    #[arg(long, value_parser = parse_status, default_value = "reported")]
    pub(crate) status: IncidentStatus,
    /// Minutes since the incident was reported
    #[arg(long, default_value_t = 0)]
    pub(crate) minutes_ago: i64,
    /// Print the raw JSON payload instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct OverloadArgs {
    /// Incident CSV export (id,type,status,severity,latitude,longitude,address,created_at)
    #[arg(long)]
    pub(crate) incidents_csv: PathBuf,
    #[command(flatten)]
    pub(crate) deployed: DeployedArgs,
    /// Print the raw JSON payload instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Incident type (medical, fire, accident, flood, police, other)
    #[arg(long = "type", value_parser = parse_incident_type)]
    pub(crate) incident_type: IncidentType,
    /// Incident severity (low, medium, high, critical)
    #[arg(long, value_parser = parse_severity)]
    pub(crate) severity: Option<Severity>,
    /// Travel distance to the scene in miles
    #[arg(long)]
    pub(crate) distance_miles: Option<f64>,
    /// Print the raw JSON payload instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        incident_type,
        description,
        visual_label,
        visual_confidence,
        json,
    } = args;

    let mut input = IncidentInput::new(incident_type, description);
    if let (Some(label), Some(confidence)) = (visual_label, visual_confidence) {
        input = input.with_visual_signal(VisualSignal::new(label, confidence));
    }

    let assessment = TriageService::default().assess(&input);
    if json {
        return print_json(&assessment);
    }
    render_assessment(&input, &assessment);
    Ok(())
}

pub(crate) fn run_explain(args: ExplainArgs) -> Result<(), AppError> {
    let trace = explain(args.incident_type, &args.description);
    if args.json {
        return print_json(&trace);
    }
    render_trace(&trace);
    Ok(())
}

pub(crate) fn run_escalation(args: EscalationArgs) -> Result<(), AppError> {
    let now = Utc::now();
    let record = IncidentRecord::new("cli-incident", IncidentType::Other)
        .with_severity(args.severity)
        .with_status(args.status)
        .created(now - Duration::minutes(args.minutes_ago));

    let view = timeline(&record, now);
    if args.json {
        return print_json(&view);
    }
    render_timeline(&view);
    Ok(())
}

pub(crate) fn run_overload(args: OverloadArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let incidents = IncidentCsvImporter::from_path(&args.incidents_csv)?;
    let deployed = args.deployed.counts();

    let report = config.engine.overload_detector().detect(&incidents, &deployed);
    if args.json {
        return print_json(&report);
    }
    println!(
        "Loaded {} incidents from {}",
        incidents.len(),
        args.incidents_csv.display()
    );
    render_overload(&report);

    let alerts = escalation_alerts(&incidents, Utc::now());
    if !alerts.is_empty() {
        println!("\nEscalation alerts");
        for alert in &alerts {
            println!(
                "- [{:?}] {} ({}) level {} {} after {} min",
                alert.urgency,
                alert.incident_id,
                alert.severity.label(),
                alert.level,
                alert.level_name,
                alert.elapsed_minutes
            );
        }
    }
    Ok(())
}

pub(crate) fn run_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let mut incident = SimulatedIncident::new(args.incident_type, args.severity);
    if let Some(miles) = args.distance_miles {
        incident = incident.at_distance(miles);
    }

    let outcomes = compare_scenarios(&incident, &scenario_presets(&incident));
    if args.json {
        return print_json(&outcomes);
    }
    render_scenarios(&outcomes);
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let now = Utc::now();
    let service = TriageService::default();

    println!("CRISIS.ONE decision engine demo");
    println!("Scenario: a warehouse fire draws several reports from the same block\n");

    let reports = [
        (
            "rpt-1",
            IncidentInput::new(
                IncidentType::Fire,
                "Large warehouse fire, two workers trapped on the second floor",
            ),
            24,
        ),
        (
            "rpt-2",
            IncidentInput::new(IncidentType::Medical, "Bystander inhaled smoke, severe coughing"),
            14,
        ),
        (
            "rpt-3",
            IncidentInput::new(IncidentType::Other, "")
                .with_visual_signal(VisualSignal::new("vehicle crash", 0.91)),
            9,
        ),
        (
            "rpt-4",
            IncidentInput::new(IncidentType::Accident, "Fire truck blocked, car crash at the corner"),
            4,
        ),
    ];

    let mut records = Vec::new();
    for (n, (id, input, minutes_ago)) in reports.iter().enumerate() {
        let assessment = service.assess(input);
        println!("Report {id}");
        render_assessment(input, &assessment);
        println!();

        records.push(
            IncidentRecord::new(*id, input.incident_type)
                .with_severity(assessment.classification.severity)
                .with_location(39.7392 + n as f64 * 0.0015, -104.9903)
                .with_address("1800 Blake St, Denver")
                .created(now - Duration::minutes(*minutes_ago)),
        );
    }

    if let Some((_, first, _)) = reports.first() {
        println!("Why was the first report classified this way?");
        render_trace(&explain(first.incident_type, &first.description));
    }

    if let Some(oldest) = records.first() {
        println!("\nEscalation of {}", oldest.id);
        render_timeline(&timeline(oldest, now));
    }

    if let Some((_, first, _)) = reports.first() {
        let severity = service.analyze(first).severity;
        println!("\nWhat-if comparison for the first report");
        let incident = SimulatedIncident::new(first.incident_type, Some(severity)).at_distance(3.0);
        render_scenarios(&compare_scenarios(&incident, &scenario_presets(&incident)));
    }

    let deployed = ResourceCounts {
        ambulance: 4,
        fire: 3,
        police: 5,
        rescue: 1,
    };
    println!("\nCoordination view");
    let report = AppConfig::load()?.engine.overload_detector().detect(&records, &deployed);
    render_overload(&report);

    let volunteer = TrustActivity {
        incidents_reported: 6,
        incidents_verified: 5,
        missions_completed: 2,
        on_time_responses: 2,
        account_age_days: 40,
        profile_complete: true,
        ..TrustActivity::default()
    };
    let trust = assess_trust(&volunteer);
    println!(
        "\nResponding volunteer trust: {} ({}) | reliability {}% | verification {}%",
        trust.score, trust.level_label, trust.stats.reliability, trust.stats.verification_rate
    );
    for item in &trust.recommendations {
        println!("  - {} ({})", item.action, item.impact);
    }

    Ok(())
}

fn render_assessment(input: &IncidentInput, assessment: &IncidentAssessment) {
    let classification = &assessment.classification;
    let plan = &assessment.plan;
    println!(
        "- {} report classified {} at {}/100",
        input.incident_type,
        classification.severity.label(),
        classification.priority_score
    );
    if let Some(rule) = classification.visual_rule {
        println!("  visual signal applied: {rule:?}");
    }
    println!(
        "  {} personnel | ETA {} min | plan confidence {}%",
        plan.required_personnel, plan.estimated_response_minutes, plan.confidence
    );
    for line in &plan.resources {
        println!("  - {} x{} ({:?})", line.kind, line.quantity, line.priority);
    }
    println!("  {}", plan.risk_narrative);
}

fn render_scenarios(outcomes: &[ScenarioOutcome]) {
    for outcome in outcomes {
        let result = &outcome.result;
        println!(
            "{}. {:<26} {:>5.1} min | survival {:>2}% ({:?})",
            outcome.scenario_id,
            outcome.name,
            result.response_time,
            result.survival_probability,
            result.risk_level
        );
        for item in &result.recommendations {
            println!("     [{:?}] {}: {}", item.priority, item.action, item.suggestion);
        }
    }
}

fn render_trace(trace: &ExplanationTrace) {
    println!(
        "{} / {} (confidence {}%, {})",
        trace.final_severity.label(),
        trace.final_score,
        trace.confidence,
        ConfidenceBand::from_confidence(trace.confidence).label()
    );
    for step in &trace.rule_path {
        println!("  {}. {}: {} -> {}", step.step, step.rule, step.input, step.output);
    }
    for matched in &trace.matched_keywords {
        println!(
            "  \"{}\" at {} ({}): {}",
            matched.keyword,
            matched.text_offset,
            matched.severity,
            matched.reason
        );
    }
    println!("  {}", trace.summary);
}

fn render_timeline(view: &EscalationTimeline) {
    let state = &view.state;
    println!(
        "- {} severity, {} min elapsed, level {} | urgency {}",
        state.severity.label(),
        state.elapsed_minutes,
        state.current_level,
        view.urgency_score
    );
    if let Some(reason) = &state.pause_reason {
        println!("  paused: {reason}");
    }
    if let Some(next) = &state.next_escalation {
        println!("  next: level {} {} in {} min", next.level, next.name, next.in_minutes);
    }
    if state.needs_immediate_attention {
        println!("  needs immediate attention");
    }
    for entry in &view.levels {
        println!(
            "  L{} {:<20} {:>4} min  {:?}",
            entry.level, entry.name, entry.threshold_minutes, entry.status
        );
    }
    for action in &view.actions {
        println!("  > {action}");
    }
}

fn render_overload(report: &OverloadReport) {
    println!(
        "- system status {:?} | {} active incidents | {} overload zone(s)",
        report.system_status,
        report.active_incidents,
        report.overload_zones.len()
    );
    for alert in &report.alerts {
        println!("  ! {}", alert.message);
    }
    for kind in ResourceKind::ALL {
        if let Some(entry) = report.utilization.by_type.get(&kind) {
            println!(
                "  {:<10} {}/{} deployed ({}%, {:?})",
                kind.as_str(),
                entry.deployed,
                entry.capacity,
                entry.percent(),
                entry.status
            );
        }
    }
    for zone in &report.overload_zones {
        println!(
            "  zone {} near {}: {} incidents, {:?}, radius {:.2} mi",
            zone.id, zone.area_name, zone.incident_count, zone.severity, zone.radius_miles
        );
    }
    for aid in &report.mutual_aid {
        for suggestion in &aid.suggestions {
            println!(
                "  [{}] {}: {}",
                aid.zone_id, suggestion.title, suggestion.description
            );
        }
    }
}
