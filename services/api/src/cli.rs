use crate::demo::{
    run_assess, run_demo, run_escalation, run_explain, run_overload, run_simulate, AssessArgs,
    EscalationArgs, ExplainArgs, OverloadArgs, SimulateArgs,
};
use crate::infra::DeployedArgs;
use crate::server;
use clap::{Args, Parser, Subcommand};
use crisis_engine::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "CRISIS.ONE Decision Engine",
    about = "Run the severity, resource, escalation and overload engine over HTTP or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Classify a report and build its resource plan
    Assess(AssessArgs),
    /// Print the rule trace behind a classification
    Explain(ExplainArgs),
    /// Show the escalation timeline for an incident of a given age
    Escalation(EscalationArgs),
    /// Detect overload zones across an incident CSV export
    Overload(OverloadArgs),
    /// Compare preset response scenarios for an incident
    Simulate(SimulateArgs),
    /// Walk through a scripted incident surge
    Demo,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory incident source from a CSV export
    #[arg(long)]
    pub(crate) incidents_csv: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) deployed: DeployedArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Explain(args) => run_explain(args),
        Command::Escalation(args) => run_escalation(args),
        Command::Overload(args) => run_overload(args),
        Command::Simulate(args) => run_simulate(args),
        Command::Demo => run_demo(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crisis_engine::triage::{IncidentType, Severity};

    #[test]
    fn serve_accepts_deployed_unit_counts() {
        let cli = Cli::try_parse_from(["crisis-api", "serve", "--fire", "3", "--police", "2"])
            .expect("serve flags parse");
        let Some(Command::Serve(args)) = cli.command else {
            panic!("expected serve command");
        };
        let counts = args.deployed.counts();
        assert_eq!(counts.fire, 3);
        assert_eq!(counts.police, 2);
        assert_eq!(counts.ambulance, 0);
    }

    #[test]
    fn overload_rejects_unknown_flags_and_shares_deployment_flags() {
        let cli = Cli::try_parse_from([
            "crisis-api",
            "overload",
            "--incidents-csv",
            "incidents.csv",
            "--rescue",
            "1",
        ])
        .expect("overload flags parse");
        let Some(Command::Overload(args)) = cli.command else {
            panic!("expected overload command");
        };
        assert_eq!(args.deployed.counts().rescue, 1);
        assert!(Cli::try_parse_from(["crisis-api", "overload", "--helicopters", "2"]).is_err());
    }

    #[test]
    fn simulate_parses_optional_severity_and_distance() {
        let cli = Cli::try_parse_from([
            "crisis-api",
            "simulate",
            "--type",
            "fire",
            "--severity",
            "critical",
            "--distance-miles",
            "4.5",
        ])
        .expect("simulate flags parse");
        let Some(Command::Simulate(args)) = cli.command else {
            panic!("expected simulate command");
        };
        assert_eq!(args.incident_type, IncidentType::Fire);
        assert_eq!(args.severity, Some(Severity::Critical));
        assert_eq!(args.distance_miles, Some(4.5));

        let bare = Cli::try_parse_from(["crisis-api", "simulate", "--type", "medical"])
            .expect("severity is optional");
        let Some(Command::Simulate(args)) = bare.command else {
            panic!("expected simulate command");
        };
        assert_eq!(args.severity, None);
    }
}
