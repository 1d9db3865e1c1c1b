use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::triage::domain::{IncidentInput, IncidentType, VisualSignal};
use crate::triage::enrichment::{EnrichmentError, ExplanationEnricher};
use crate::triage::explain::ExplanationTrace;
use crate::triage::service::TriageService;

pub(super) const SHORT_TIMEOUT: Duration = Duration::from_millis(50);

pub(super) fn structure_fire() -> IncidentInput {
    IncidentInput::new(
        IncidentType::Fire,
        "Large structure fire, people trapped inside",
    )
}

pub(super) fn vehicle_report() -> IncidentInput {
    IncidentInput::new(IncidentType::Other, "").with_visual_signal(VisualSignal::new("vehicle crash", 0.9))
}

/// Enricher that echoes the trace summary and counts calls.
#[derive(Default)]
pub(super) struct EchoEnricher {
    calls: AtomicUsize,
}

impl EchoEnricher {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExplanationEnricher for EchoEnricher {
    async fn enrich(&self, trace: &ExplanationTrace) -> Result<String, EnrichmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("Narrated: {}", trace.summary))
    }
}

pub(super) struct FailingEnricher;

#[async_trait]
impl ExplanationEnricher for FailingEnricher {
    async fn enrich(&self, _trace: &ExplanationTrace) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::Unavailable("quota exhausted".to_string()))
    }
}

pub(super) struct StalledEnricher;

#[async_trait]
impl ExplanationEnricher for StalledEnricher {
    async fn enrich(&self, _trace: &ExplanationTrace) -> Result<String, EnrichmentError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok("too late".to_string())
    }
}

pub(super) fn service_with(enricher: Arc<dyn ExplanationEnricher>) -> TriageService {
    TriageService::new(SHORT_TIMEOUT).with_enricher(enricher)
}

pub(super) fn json_request(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
