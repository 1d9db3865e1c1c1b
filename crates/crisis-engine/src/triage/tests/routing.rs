use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;

use crate::triage::router::{resources_handler, triage_router, ResourcesRequest};
use crate::triage::service::TriageService;

fn router() -> axum::Router {
    triage_router(Arc::new(TriageService::default()))
}

#[tokio::test]
async fn analyze_route_returns_classification() {
    let response = router()
        .oneshot(json_request(
            "/api/v1/incidents/analyze",
            &json!({
                "type": "other",
                "description": "",
                "visualSignal": {"label": "vehicle crash", "confidence": 0.9}
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["severity"], json!("medium"));
    assert_eq!(payload["priorityScore"], json!(45));
    assert_eq!(payload["visualRule"], json!("vehicle_label"));
    assert_eq!(payload["evidence"]["typeBaseScore"], json!(25));
}

#[tokio::test]
async fn analyze_route_rejects_missing_type() {
    let response = router()
        .oneshot(json_request(
            "/api/v1/incidents/analyze",
            &json!({"description": "fire"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("type is required"));
}

#[tokio::test]
async fn unknown_type_is_classified_as_other() {
    let response = router()
        .oneshot(json_request(
            "/api/v1/incidents/analyze",
            &json!({"type": "earthquake", "description": "cracks in wall"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["evidence"]["typeBaseScore"], json!(25));
}

#[tokio::test]
async fn resources_route_defaults_severity_to_medium() {
    let response = router()
        .oneshot(json_request(
            "/api/v1/incidents/resources",
            &json!({"type": "medical", "description": "fainted"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["confidence"], json!(70));
    assert_eq!(
        payload["riskNarrative"],
        json!("MODERATE RISK - Standard response protocol. Assess on arrival.")
    );
    assert_eq!(payload["resources"][0]["kind"], json!("Ambulance"));
}

#[tokio::test]
async fn resources_handler_treats_unknown_severity_as_absent() {
    let request: ResourcesRequest =
        serde_json::from_value(json!({"type": "police", "severity": "urgent"}))
            .expect("request parses");
    assert_eq!(request.severity, None);

    let response = resources_handler(
        State(Arc::new(TriageService::default())),
        axum::Json(request),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["confidence"], json!(70));
    assert_eq!(
        payload["riskNarrative"],
        json!("LOW RISK - Routine response. Single unit may suffice.")
    );
}

#[tokio::test]
async fn resources_route_rejects_missing_type() {
    let response = router()
        .oneshot(json_request(
            "/api/v1/incidents/resources",
            &json!({"severity": "high"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn explain_route_reports_disabled_enrichment() {
    let response = router()
        .oneshot(json_request(
            "/api/v1/incidents/explain",
            &json!({"type": "fire", "description": "Large structure fire, people trapped inside"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["trace"]["finalSeverity"], json!("critical"));
    assert_eq!(payload["trace"]["matchedKeywords"][0]["textOffset"], json!(16));
    assert_eq!(payload["enrichment"]["status"], json!("disabled"));
    assert_eq!(payload["narrative"], json!("AI explanation unavailable"));
}

#[tokio::test]
async fn explain_route_uses_configured_enricher() {
    let router = triage_router(Arc::new(service_with(Arc::new(EchoEnricher::default()))));
    let response = router
        .oneshot(json_request(
            "/api/v1/incidents/explain",
            &json!({"type": "police", "description": "robbery"}),
        ))
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    assert_eq!(payload["enrichment"]["status"], json!("available"));
}

#[tokio::test]
async fn assess_route_returns_classification_and_plan() {
    let response = router()
        .oneshot(json_request(
            "/api/v1/incidents/assess",
            &json!({"type": "flood", "description": "family trapped on roof"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["classification"]["severity"], json!("critical"));
    assert_eq!(payload["plan"]["requiredPersonnel"], json!(15));
}

#[tokio::test]
async fn offline_estimate_route_flags_advisory_result() {
    let response = router()
        .oneshot(json_request(
            "/api/v1/incidents/offline-estimate",
            &json!({"type": "fire", "description": "burning car", "severity": "high"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["isOfflineEstimate"], json!(true));
    assert_eq!(payload["score"], json!(50));
    assert_eq!(payload["severity"], json!("high"));
}

#[tokio::test]
async fn simulate_route_applies_delay_and_extra_units() {
    let response = router()
        .oneshot(json_request(
            "/api/v1/incidents/simulate",
            &json!({
                "incident": {"type": "medical", "severity": "critical"},
                "config": {"ambulanceCount": 2, "delayMinutes": 5}
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["responseTime"], json!(10.6));
    assert_eq!(payload["survivalProbability"], json!(59));
    assert_eq!(payload["riskLevel"], json!("high"));
    assert_eq!(payload["resourcesDeployed"]["ambulance"], json!(2));
    assert_eq!(
        payload["recommendations"][2]["action"],
        json!("5 minute delay detected")
    );
}

#[tokio::test]
async fn scenarios_route_compares_presets_by_default() {
    let response = router()
        .oneshot(json_request(
            "/api/v1/incidents/scenarios",
            &json!({"incident": {"type": "fire", "severity": "critical"}}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let outcomes = payload.as_array().expect("outcome list");
    assert_eq!(outcomes.len(), 5);
    assert_eq!(outcomes[3]["scenarioId"], json!(4));
    assert_eq!(outcomes[3]["name"], json!("Maximum Response"));
    assert_eq!(outcomes[3]["responseTime"], json!(2.0));
    assert_eq!(outcomes[3]["survivalProbability"], json!(79));
}
