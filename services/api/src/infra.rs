use crisis_engine::coordination::{
    IncidentCsvImporter, IncidentImportError, IncidentRecord, IncidentSource, IncidentStatus,
    ResourceCounts, SourceError,
};
use crisis_engine::triage::{IncidentType, Severity};
use clap::Args;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Incident source backed by process memory, optionally seeded from a CSV export.
#[derive(Default, Clone)]
pub(crate) struct InMemoryIncidentSource {
    incidents: Arc<Mutex<Vec<IncidentRecord>>>,
    deployed: Arc<Mutex<ResourceCounts>>,
}

impl InMemoryIncidentSource {
    pub(crate) fn with_incidents(incidents: Vec<IncidentRecord>) -> Self {
        Self {
            incidents: Arc::new(Mutex::new(incidents)),
            deployed: Arc::default(),
        }
    }

    pub(crate) fn from_csv(path: &Path) -> Result<Self, IncidentImportError> {
        IncidentCsvImporter::from_path(path).map(Self::with_incidents)
    }

    pub(crate) fn set_deployed(&self, counts: ResourceCounts) -> Result<(), SourceError> {
        let mut guard = self
            .deployed
            .lock()
            .map_err(|_| SourceError::Unavailable("deployment mutex poisoned".to_string()))?;
        *guard = counts;
        Ok(())
    }

    pub(crate) fn incident_count(&self) -> usize {
        self.incidents.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl IncidentSource for InMemoryIncidentSource {
    fn incidents(&self) -> Result<Vec<IncidentRecord>, SourceError> {
        let guard = self
            .incidents
            .lock()
            .map_err(|_| SourceError::Unavailable("incident mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn deployed_resources(&self) -> Result<ResourceCounts, SourceError> {
        let guard = self
            .deployed
            .lock()
            .map_err(|_| SourceError::Unavailable("deployment mutex poisoned".to_string()))?;
        Ok(*guard)
    }
}

/// Units already committed elsewhere, counted against configured capacity.
#[derive(Args, Debug, Default, Clone, Copy)]
pub(crate) struct DeployedArgs {
    /// Ambulances currently deployed
    #[arg(long, default_value_t = 0)]
    pub(crate) ambulance: u32,
    /// Fire units currently deployed
    #[arg(long, default_value_t = 0)]
    pub(crate) fire: u32,
    /// Police units currently deployed
    #[arg(long, default_value_t = 0)]
    pub(crate) police: u32,
    /// Rescue units currently deployed
    #[arg(long, default_value_t = 0)]
    pub(crate) rescue: u32,
}

impl DeployedArgs {
    pub(crate) fn counts(self) -> ResourceCounts {
        ResourceCounts {
            ambulance: self.ambulance,
            fire: self.fire,
            police: self.police,
            rescue: self.rescue,
        }
    }
}

pub(crate) fn parse_incident_type(raw: &str) -> Result<IncidentType, String> {
    let kind = IncidentType::parse(raw);
    if kind == IncidentType::Other && !raw.trim().eq_ignore_ascii_case("other") {
        return Err(format!(
            "unknown incident type '{raw}' (expected medical, fire, accident, flood, police or other)"
        ));
    }
    Ok(kind)
}

pub(crate) fn parse_severity(raw: &str) -> Result<Severity, String> {
    Severity::parse(raw)
        .ok_or_else(|| format!("unknown severity '{raw}' (expected low, medium, high or critical)"))
}

pub(crate) fn parse_status(raw: &str) -> Result<IncidentStatus, String> {
    match IncidentStatus::parse(raw) {
        IncidentStatus::Unrecognized => Err(format!(
            "unknown status '{raw}' (expected reported, assigned, on_the_way, in_progress, resolved or cancelled)"
        )),
        status => Ok(status),
    }
}
