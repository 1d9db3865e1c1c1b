use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::escalation::{escalation_alerts, EscalationAlert};
use super::overload::{OverloadDetector, OverloadReport};
use super::repository::{IncidentSource, SourceError};

/// Dashboard snapshot combining overload detection and escalation alerts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinationSnapshot {
    pub evaluated_at: DateTime<Utc>,
    pub overload: OverloadReport,
    pub escalation_alerts: Vec<EscalationAlert>,
}

/// Service composing the incident source with the overload detector.
pub struct CoordinationService<S> {
    source: Arc<S>,
    detector: OverloadDetector,
}

impl<S> CoordinationService<S>
where
    S: IncidentSource + 'static,
{
    pub fn new(source: Arc<S>, detector: OverloadDetector) -> Self {
        Self { source, detector }
    }

    pub fn detector(&self) -> &OverloadDetector {
        &self.detector
    }

    /// Evaluate the current incident set at `now`.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Result<CoordinationSnapshot, CoordinationError> {
        let incidents = self.source.incidents()?;
        let deployed = self.source.deployed_resources()?;

        let overload = self.detector.detect(&incidents, &deployed);
        let alerts = escalation_alerts(&incidents, now);

        info!(
            incidents = incidents.len(),
            active = overload.active_incidents,
            zones = overload.overload_zones.len(),
            escalation_alerts = alerts.len(),
            status = ?overload.system_status,
            "coordination snapshot evaluated"
        );

        Ok(CoordinationSnapshot {
            evaluated_at: now,
            overload,
            escalation_alerts: alerts,
        })
    }
}

/// Error raised by the coordination service.
#[derive(Debug, thiserror::Error)]
pub enum CoordinationError {
    #[error(transparent)]
    Source(#[from] SourceError),
}
