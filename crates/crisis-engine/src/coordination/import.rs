use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{parse_text_timestamp, IncidentLocation, IncidentRecord, IncidentStatus, Timestamp};
use crate::triage::domain::{IncidentType, Severity};

#[derive(Debug)]
pub enum IncidentImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for IncidentImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentImportError::Io(err) => write!(f, "failed to read incident export: {}", err),
            IncidentImportError::Csv(err) => write!(f, "invalid incident CSV data: {}", err),
        }
    }
}

impl std::error::Error for IncidentImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IncidentImportError::Io(err) => Some(err),
            IncidentImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for IncidentImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for IncidentImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads incident records from a storage CSV export.
pub struct IncidentCsvImporter;

impl IncidentCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<IncidentRecord>, IncidentImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<IncidentRecord>, IncidentImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for row in csv_reader.deserialize::<IncidentRow>() {
            records.push(row?.into_record());
        }

        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct IncidentRow {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default, deserialize_with = "empty_string_as_none")]
    incident_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    severity: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    latitude: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    longitude: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    created_at: Option<String>,
}

impl IncidentRow {
    fn into_record(self) -> IncidentRecord {
        let location = match (
            self.latitude.as_deref().and_then(parse_coordinate),
            self.longitude.as_deref().and_then(parse_coordinate),
        ) {
            (Some(lat), Some(lng)) => Some(IncidentLocation {
                lat,
                lng,
                address: None,
            }),
            _ => None,
        };

        IncidentRecord {
            id: self.id,
            incident_type: self
                .incident_type
                .as_deref()
                .map(IncidentType::parse)
                .unwrap_or_default(),
            status: self
                .status
                .as_deref()
                .map(IncidentStatus::parse)
                .unwrap_or_default(),
            severity: self.severity.as_deref().and_then(Severity::parse),
            location,
            address: self.address,
            created_at: self
                .created_at
                .as_deref()
                .and_then(parse_text_timestamp)
                .map(Timestamp::from_datetime),
        }
    }
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_without_coordinates_keep_no_location() {
        let csv = "id,type,status,severity,latitude,longitude,address,created_at\n\
                   a,fire,reported,high,north,-74.0,\"12 Main St, Springfield\",2025-01-01\n";
        let records = IncidentCsvImporter::from_reader(csv.as_bytes()).expect("csv parses");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location, None);
        assert_eq!(records[0].severity, Some(Severity::High));
        assert_eq!(records[0].address.as_deref(), Some("12 Main St, Springfield"));
    }

    #[test]
    fn empty_cells_fall_back_to_defaults() {
        let csv = "id,type,status,severity,latitude,longitude,address,created_at\n\
                   b,,,,,,,\n";
        let records = IncidentCsvImporter::from_reader(csv.as_bytes()).expect("csv parses");
        let record = &records[0];
        assert_eq!(record.incident_type, IncidentType::Other);
        assert_eq!(record.status, IncidentStatus::Reported);
        assert_eq!(record.severity, None);
        assert_eq!(record.created_at, None);
    }
}
