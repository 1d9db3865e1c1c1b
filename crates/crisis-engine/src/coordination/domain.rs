use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::triage::domain::{deserialize_lenient_severity, lenient_label, IncidentType, Severity};

/// Lifecycle state of a stored incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    #[default]
    Reported,
    Assigned,
    OnTheWay,
    InProgress,
    Resolved,
    Cancelled,
    /// Anything outside the known lifecycle. Neither active nor terminal.
    Unrecognized,
}

impl IncidentStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "reported" => Self::Reported,
            "assigned" => Self::Assigned,
            "on_the_way" => Self::OnTheWay,
            "in_progress" => Self::InProgress,
            "resolved" => Self::Resolved,
            "cancelled" => Self::Cancelled,
            _ => Self::Unrecognized,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reported => "reported",
            Self::Assigned => "assigned",
            Self::OnTheWay => "on_the_way",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Cancelled => "cancelled",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Human-readable form used in pause reasons.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reported => "reported",
            Self::Assigned => "assigned",
            Self::OnTheWay => "on the way",
            Self::InProgress => "in progress",
            Self::Resolved => "resolved",
            Self::Cancelled => "cancelled",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Counted by the overload detector.
    pub const fn is_active(self) -> bool {
        matches!(
            self,
            Self::Reported | Self::Assigned | Self::OnTheWay | Self::InProgress
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Cancelled)
    }

    /// Highest escalation level a response in this state holds back; 0 when none.
    pub const fn pause_level(self) -> u8 {
        match self {
            Self::Assigned => 1,
            Self::OnTheWay => 2,
            Self::InProgress => 3,
            _ => 0,
        }
    }
}

impl<'de> Deserialize<'de> for IncidentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient_label(deserializer)?;
        Ok(raw.as_deref().map(Self::parse).unwrap_or_default())
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Stored location. Accepts `lat/lng`, `latitude/longitude` and GeoPoint `_lat/_long` keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentLocation {
    #[serde(alias = "latitude", alias = "_lat")]
    pub lat: f64,
    #[serde(alias = "longitude", alias = "_long")]
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl IncidentLocation {
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// Creation instant in any of the encodings the storage layer has produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    MillisFloat(f64),
    Firestore {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
    Text(String),
    Other(serde_json::Value),
}

impl Timestamp {
    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Self::Millis(value.timestamp_millis())
    }

    /// `None` when the value cannot be interpreted as an instant.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Millis(millis) => Utc.timestamp_millis_opt(*millis).single(),
            Self::MillisFloat(millis) if millis.is_finite() => {
                Utc.timestamp_millis_opt(millis.trunc() as i64).single()
            }
            Self::MillisFloat(_) => None,
            Self::Firestore {
                seconds,
                nanoseconds,
            } => Utc.timestamp_opt(*seconds, *nanoseconds).single(),
            Self::Text(raw) => parse_text_timestamp(raw),
            Self::Other(_) => None,
        }
    }
}

/// RFC 3339, `YYYY-MM-DD` (midnight UTC) or decimal epoch milliseconds.
pub fn parse_text_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    trimmed
        .parse::<i64>()
        .ok()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}

/// Incident as read from storage for escalation and overload evaluation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub incident_type: IncidentType,
    #[serde(default)]
    pub status: IncidentStatus,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_severity",
        skip_serializing_if = "Option::is_none"
    )]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<IncidentLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl IncidentRecord {
    pub fn new(id: impl Into<String>, incident_type: IncidentType) -> Self {
        Self {
            id: id.into(),
            incident_type,
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: IncidentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.location = Some(IncidentLocation {
            lat,
            lng,
            address: None,
        });
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(Timestamp::from_datetime(at));
        self
    }

    /// Escalation and overload read a missing severity as `medium`.
    pub fn severity_or_medium(&self) -> Severity {
        self.severity.unwrap_or(Severity::Medium)
    }

    pub fn coordinates(&self) -> Option<GeoPoint> {
        self.location
            .as_ref()
            .map(IncidentLocation::point)
            .filter(|point| point.lat.is_finite() && point.lng.is_finite())
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_ref().and_then(Timestamp::to_datetime)
    }

    /// Top-level address, falling back to the one stored on the location.
    pub fn display_address(&self) -> Option<&str> {
        self.address
            .as_deref()
            .or_else(|| self.location.as_ref().and_then(|loc| loc.address.as_deref()))
    }
}
