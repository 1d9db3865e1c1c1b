use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use crisis_engine::community::community_router;
use crisis_engine::coordination::{coordination_router, CoordinationService, IncidentSource};
use crisis_engine::triage::{triage_router, TriageService};
use serde_json::json;
use std::sync::Arc;

/// Decision routers plus the operational endpoints. Expects an `AppState` extension layer.
pub(crate) fn with_service_routes<S>(
    triage: Arc<TriageService>,
    coordination: Arc<CoordinationService<S>>,
) -> axum::Router
where
    S: IncidentSource + 'static,
{
    triage_router(triage)
        .merge(coordination_router(coordination))
        .merge(community_router())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
