use super::domain::IncidentRecord;
use super::overload::ResourceCounts;

/// Read-only view over the live incident set, so coordination can run without storage.
pub trait IncidentSource: Send + Sync {
    fn incidents(&self) -> Result<Vec<IncidentRecord>, SourceError>;
    fn deployed_resources(&self) -> Result<ResourceCounts, SourceError>;
}

/// Error enumeration for incident source failures.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("incident source unavailable: {0}")]
    Unavailable(String),
    #[error("incident source returned malformed data: {0}")]
    Malformed(String),
}
