use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::domain::IncidentRecord;
use super::escalation::{escalation_alerts, timeline};
use super::overload::ResourceCounts;
use super::repository::IncidentSource;
use super::service::CoordinationService;
use crate::error::AppError;

/// Router builder exposing escalation and overload endpoints.
pub fn coordination_router<S>(service: Arc<CoordinationService<S>>) -> Router
where
    S: IncidentSource + 'static,
{
    Router::new()
        .route("/api/v1/escalation/timeline", post(timeline_handler::<S>))
        .route("/api/v1/escalation/alerts", post(alerts_handler::<S>))
        .route("/api/v1/overload", post(overload_handler::<S>))
        .route("/api/v1/coordination/status", get(status_handler::<S>))
        .with_state(service)
}

/// One incident plus an optional evaluation instant (defaults to the current time).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TimelineRequest {
    #[serde(flatten)]
    pub(crate) incident: IncidentRecord,
    #[serde(default)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IncidentListRequest {
    #[serde(default)]
    pub(crate) incidents: Vec<IncidentRecord>,
    #[serde(default)]
    pub(crate) deployed_resources: ResourceCounts,
    #[serde(default)]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) async fn timeline_handler<S>(
    State(_service): State<Arc<CoordinationService<S>>>,
    axum::Json(request): axum::Json<TimelineRequest>,
) -> Response
where
    S: IncidentSource + 'static,
{
    let now = request.now.unwrap_or_else(Utc::now);
    let view = timeline(&request.incident, now);
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn alerts_handler<S>(
    State(_service): State<Arc<CoordinationService<S>>>,
    axum::Json(request): axum::Json<IncidentListRequest>,
) -> Response
where
    S: IncidentSource + 'static,
{
    let now = request.now.unwrap_or_else(Utc::now);
    let alerts = escalation_alerts(&request.incidents, now);
    (StatusCode::OK, axum::Json(alerts)).into_response()
}

pub(crate) async fn overload_handler<S>(
    State(service): State<Arc<CoordinationService<S>>>,
    axum::Json(request): axum::Json<IncidentListRequest>,
) -> Response
where
    S: IncidentSource + 'static,
{
    let report = service
        .detector()
        .detect(&request.incidents, &request.deployed_resources);
    (StatusCode::OK, axum::Json(report)).into_response()
}

pub(crate) async fn status_handler<S>(
    State(service): State<Arc<CoordinationService<S>>>,
) -> Result<Response, AppError>
where
    S: IncidentSource + 'static,
{
    let snapshot = service.snapshot(Utc::now())?;
    Ok((StatusCode::OK, axum::Json(snapshot)).into_response())
}
