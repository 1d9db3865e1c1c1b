use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryIncidentSource};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use crisis_engine::config::AppConfig;
use crisis_engine::coordination::{CoordinationError, CoordinationService};
use crisis_engine::error::AppError;
use crisis_engine::telemetry;
use crisis_engine::triage::TriageService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let source = match args.incidents_csv.take() {
        Some(path) => InMemoryIncidentSource::from_csv(&path)?,
        None => InMemoryIncidentSource::default(),
    };
    source
        .set_deployed(args.deployed.counts())
        .map_err(CoordinationError::from)?;
    info!(incidents = source.incident_count(), "incident source seeded");

    let triage = Arc::new(TriageService::new(config.engine.enrichment_timeout));
    info!(
        enrichment = triage.enrichment_enabled(),
        "generative explanation enrichment"
    );
    let coordination = Arc::new(CoordinationService::new(
        Arc::new(source),
        config.engine.overload_detector(),
    ));

    let app = with_service_routes(triage, coordination)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "crisis decision engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
