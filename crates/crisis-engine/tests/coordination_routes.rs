use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use crisis_engine::coordination::{
    coordination_router, CoordinationService, IncidentRecord, IncidentSource, OverloadDetector,
    ResourceCounts, SourceError,
};
use crisis_engine::triage::{IncidentType, Severity};
use serde_json::{json, Value};
use tower::ServiceExt;

struct FixedSource {
    incidents: Vec<IncidentRecord>,
    deployed: ResourceCounts,
}

impl IncidentSource for FixedSource {
    fn incidents(&self) -> Result<Vec<IncidentRecord>, SourceError> {
        Ok(self.incidents.clone())
    }

    fn deployed_resources(&self) -> Result<ResourceCounts, SourceError> {
        Ok(self.deployed)
    }
}

struct OfflineSource;

impl IncidentSource for OfflineSource {
    fn incidents(&self) -> Result<Vec<IncidentRecord>, SourceError> {
        Err(SourceError::Unavailable("connection refused".to_string()))
    }

    fn deployed_resources(&self) -> Result<ResourceCounts, SourceError> {
        Ok(ResourceCounts::default())
    }
}

fn router_with<S: IncidentSource + 'static>(source: S) -> Router {
    let service = CoordinationService::new(Arc::new(source), OverloadDetector::default());
    coordination_router(Arc::new(service))
}

fn busy_block() -> FixedSource {
    let incidents = (0..5)
        .map(|n| {
            IncidentRecord::new(format!("inc-{n}"), IncidentType::Fire)
                .with_severity(Severity::High)
                .with_location(40.7128 + n as f64 * 0.001, -74.0060)
                .with_address("1 Harbor Way, Springfield")
        })
        .collect();
    FixedSource {
        incidents,
        deployed: ResourceCounts::default(),
    }
}

fn json_request(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn timeline_route_evaluates_at_the_supplied_instant() {
    let response = router_with(busy_block())
        .oneshot(json_request(
            "/api/v1/escalation/timeline",
            &json!({
                "id": "inc-9",
                "type": "fire",
                "severity": "high",
                "createdAt": "2025-03-14T17:51:00Z",
                "now": "2025-03-14T18:00:00Z"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["currentLevel"], json!(2));
    assert_eq!(payload["elapsedMinutes"], json!(9));
    assert_eq!(payload["urgencyScore"], json!(59));
    assert_eq!(payload["nextEscalation"]["inMinutes"], json!(1));
    assert_eq!(payload["levels"][2]["status"], json!("pending"));
}

#[tokio::test]
async fn timeline_route_accepts_firestore_timestamps() {
    let response = router_with(busy_block())
        .oneshot(json_request(
            "/api/v1/escalation/timeline",
            &json!({
                "id": "inc-10",
                "type": "medical",
                "status": "in_progress",
                "createdAt": {"_seconds": 1741974000, "_nanoseconds": 0},
                "now": "2025-03-14T18:00:00Z"
            }),
        ))
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    assert_eq!(payload["elapsedMinutes"], json!(20));
    assert_eq!(payload["severity"], json!("medium"));
    assert_eq!(payload["currentLevel"], json!(3));
    assert_eq!(payload["paused"], json!(true));
}

#[tokio::test]
async fn alerts_route_sorts_by_level() {
    let response = router_with(busy_block())
        .oneshot(json_request(
            "/api/v1/escalation/alerts",
            &json!({
                "now": "2025-03-14T18:00:00Z",
                "incidents": [
                    {"id": "a", "type": "police", "severity": "high", "createdAt": "2025-03-14T17:48:00Z"},
                    {"id": "b", "type": "fire", "severity": "critical", "createdAt": "2025-03-14T17:45:00Z"},
                    {"id": "c", "type": "flood", "severity": "low", "createdAt": "2025-03-14T17:55:00Z"}
                ]
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let alerts = payload.as_array().expect("alert list");
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0]["incidentId"], json!("b"));
    assert_eq!(alerts[0]["level"], json!(5));
    assert_eq!(alerts[1]["incidentId"], json!("a"));
    assert_eq!(alerts[1]["type"], json!("police"));
}

#[tokio::test]
async fn overload_route_grades_posted_incidents() {
    let incidents: Vec<Value> = (0..3u32)
        .map(|n| {
            json!({
                "id": format!("p-{n}"),
                "type": "accident",
                "status": "reported",
                "location": {"latitude": 34.05 + f64::from(n) * 0.001, "longitude": -118.24},
                "address": "Sunset Blvd, Los Angeles"
            })
        })
        .collect();

    let response = router_with(busy_block())
        .oneshot(json_request(
            "/api/v1/overload",
            &json!({
                "incidents": incidents,
                "deployedResources": {"police": 8}
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["systemStatus"], json!("elevated"));
    assert_eq!(payload["overloadZones"][0]["incidentCount"], json!(3));
    assert_eq!(payload["overloadZones"][0]["areaName"], json!("Sunset Blvd"));
    assert_eq!(payload["utilization"]["byType"]["police"]["status"], json!("critical"));
    assert_eq!(
        payload["mutualAid"][0]["suggestions"][0]["description"],
        json!("Shortfall detected: 3 police")
    );
}

#[tokio::test]
async fn list_routes_tolerate_null_fields_in_exports() {
    let response = router_with(busy_block())
        .oneshot(json_request(
            "/api/v1/overload",
            &json!({
                "incidents": [
                    {"id": "n-1", "type": null, "status": null, "severity": null,
                     "location": {"lat": 40.0, "lng": -75.0}, "address": null},
                    {"id": "n-2", "type": "fire", "status": "reported"}
                ],
                "deployedResources": {}
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["activeIncidents"], json!(2));
    assert_eq!(payload["overloadZones"], json!([]));
}

#[tokio::test]
async fn status_route_reads_from_the_source() {
    let response = router_with(busy_block())
        .oneshot(
            Request::get("/api/v1/coordination/status")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["overload"]["systemStatus"], json!("critical"));
    assert_eq!(payload["overload"]["activeIncidents"], json!(5));
    assert_eq!(payload["escalationAlerts"], json!([]));
}

#[tokio::test]
async fn status_route_surfaces_source_failures() {
    let response = router_with(OfflineSource)
        .oneshot(
            Request::get("/api/v1/coordination/status")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["error"],
        json!("incident source unavailable: connection refused")
    );
}
