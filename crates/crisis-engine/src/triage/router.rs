use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{deserialize_lenient_severity, IncidentInput, IncidentType, Severity, VisualSignal};
use super::offline::estimate_offline;
use super::service::TriageService;
use super::simulation::{
    compare_scenarios, scenario_presets, simulate, ResponseConfig, Scenario, SimulatedIncident,
};

/// Router builder exposing the per-report decision endpoints.
pub fn triage_router(service: Arc<TriageService>) -> Router {
    Router::new()
        .route("/api/v1/incidents/analyze", post(analyze_handler))
        .route("/api/v1/incidents/resources", post(resources_handler))
        .route("/api/v1/incidents/explain", post(explain_handler))
        .route("/api/v1/incidents/assess", post(assess_handler))
        .route(
            "/api/v1/incidents/offline-estimate",
            post(offline_estimate_handler),
        )
        .route("/api/v1/incidents/simulate", post(simulate_handler))
        .route("/api/v1/incidents/scenarios", post(scenarios_handler))
        .with_state(service)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnalyzeRequest {
    #[serde(rename = "type")]
    pub(crate) incident_type: Option<IncidentType>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) visual_signal: Option<VisualSignal>,
}

impl AnalyzeRequest {
    fn into_input(self) -> Option<IncidentInput> {
        let kind = self.incident_type?;
        Some(IncidentInput {
            incident_type: kind,
            description: self.description.unwrap_or_default(),
            visual_signal: self.visual_signal,
        })
    }
}

fn default_request_severity() -> Option<Severity> {
    Some(Severity::Medium)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResourcesRequest {
    #[serde(rename = "type")]
    pub(crate) incident_type: Option<IncidentType>,
    /// Omitted means `medium`; an unrecognized value is kept as absent.
    #[serde(
        default = "default_request_severity",
        deserialize_with = "deserialize_lenient_severity"
    )]
    pub(crate) severity: Option<Severity>,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OfflineEstimateRequest {
    #[serde(rename = "type", default)]
    pub(crate) incident_type: IncidentType,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_severity")]
    pub(crate) severity: Option<Severity>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SimulateRequest {
    #[serde(default)]
    pub(crate) incident: SimulatedIncident,
    #[serde(default)]
    pub(crate) config: ResponseConfig,
}

/// Without `scenarios`, the stock presets for the incident are compared.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ScenariosRequest {
    #[serde(default)]
    pub(crate) incident: SimulatedIncident,
    #[serde(default)]
    pub(crate) scenarios: Option<Vec<Scenario>>,
}

fn missing_type() -> Response {
    let payload = json!({
        "error": "type is required",
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

pub(crate) async fn analyze_handler(
    State(service): State<Arc<TriageService>>,
    axum::Json(request): axum::Json<AnalyzeRequest>,
) -> Response {
    match request.into_input() {
        Some(input) => {
            let classification = service.analyze(&input);
            (StatusCode::OK, axum::Json(classification)).into_response()
        }
        None => missing_type(),
    }
}

pub(crate) async fn resources_handler(
    State(service): State<Arc<TriageService>>,
    axum::Json(request): axum::Json<ResourcesRequest>,
) -> Response {
    let Some(kind) = request.incident_type else {
        return missing_type();
    };
    let description = request.description.unwrap_or_default();
    let plan = service.plan(kind, request.severity, &description);
    (StatusCode::OK, axum::Json(plan)).into_response()
}

pub(crate) async fn explain_handler(
    State(service): State<Arc<TriageService>>,
    axum::Json(request): axum::Json<AnalyzeRequest>,
) -> Response {
    let kind = request.incident_type.unwrap_or_default();
    let description = request.description.unwrap_or_default();
    let explanation = service.explain(kind, &description).await;
    (StatusCode::OK, axum::Json(explanation)).into_response()
}

pub(crate) async fn assess_handler(
    State(service): State<Arc<TriageService>>,
    axum::Json(request): axum::Json<AnalyzeRequest>,
) -> Response {
    match request.into_input() {
        Some(input) => {
            let assessment = service.assess(&input);
            (StatusCode::OK, axum::Json(assessment)).into_response()
        }
        None => missing_type(),
    }
}

pub(crate) async fn offline_estimate_handler(
    axum::Json(request): axum::Json<OfflineEstimateRequest>,
) -> Response {
    let description = request.description.unwrap_or_default();
    let estimate = estimate_offline(request.incident_type, &description, request.severity);
    (StatusCode::OK, axum::Json(estimate)).into_response()
}

pub(crate) async fn simulate_handler(axum::Json(request): axum::Json<SimulateRequest>) -> Response {
    let result = simulate(&request.incident, &request.config);
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn scenarios_handler(
    axum::Json(request): axum::Json<ScenariosRequest>,
) -> Response {
    let scenarios = request
        .scenarios
        .unwrap_or_else(|| scenario_presets(&request.incident));
    let outcomes = compare_scenarios(&request.incident, &scenarios);
    (StatusCode::OK, axum::Json(outcomes)).into_response()
}
