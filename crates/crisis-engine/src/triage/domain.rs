use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Incident category reported by the citizen. Unrecognized values collapse to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    Medical,
    Fire,
    Accident,
    Flood,
    Police,
    #[default]
    Other,
}

impl IncidentType {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Medical,
            Self::Fire,
            Self::Accident,
            Self::Flood,
            Self::Police,
            Self::Other,
        ]
    }

    /// Map a stored or reported type label onto a category by containment, so
    /// compound labels such as `structure_fire` keep their category. Checked in
    /// the order fire, medical, accident, police, flood.
    pub fn parse(raw: &str) -> Self {
        let key = raw.trim().to_ascii_lowercase();
        [
            ("fire", Self::Fire),
            ("medical", Self::Medical),
            ("accident", Self::Accident),
            ("police", Self::Police),
            ("flood", Self::Flood),
        ]
        .into_iter()
        .find(|(needle, _)| key.contains(needle))
        .map_or(Self::Other, |(_, kind)| kind)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Medical => "medical",
            Self::Fire => "fire",
            Self::Accident => "accident",
            Self::Flood => "flood",
            Self::Police => "police",
            Self::Other => "other",
        }
    }
}

impl<'de> Deserialize<'de> for IncidentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient_label(deserializer)?;
        Ok(raw.as_deref().map(Self::parse).unwrap_or_default())
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered severity scale (`Low < Medium < High < Critical`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const fn ordered() -> [Self; 4] {
        [Self::Low, Self::Medium, Self::High, Self::Critical]
    }

    /// Case-insensitive parse; `None` for anything outside the scale.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read a loosely typed label. Null and non-string JSON values read as absent.
pub(crate) fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.as_str().map(str::to_owned)))
}

/// Deserialize an optional severity, mapping unknown strings to `None` instead of failing.
pub fn deserialize_lenient_severity<'de, D>(deserializer: D) -> Result<Option<Severity>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = lenient_label(deserializer)?;
    Ok(raw.as_deref().and_then(Severity::parse))
}

/// Label/confidence pair produced by the image-classification collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualSignal {
    pub label: String,
    pub confidence: f64,
}

impl VisualSignal {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Inbound report as consumed by the classifier and planner.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentInput {
    #[serde(rename = "type", default)]
    pub incident_type: IncidentType,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_signal: Option<VisualSignal>,
}

impl IncidentInput {
    pub fn new(incident_type: IncidentType, description: impl Into<String>) -> Self {
        Self {
            incident_type,
            description: description.into(),
            visual_signal: None,
        }
    }

    pub fn with_visual_signal(mut self, signal: VisualSignal) -> Self {
        self.visual_signal = Some(signal);
        self
    }
}
