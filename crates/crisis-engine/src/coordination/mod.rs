//! Live-incident coordination: escalation timelines, overload zones and the
//! storage seam they read from.

pub mod domain;
pub mod escalation;
pub mod geo;
pub mod import;
pub mod overload;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{GeoPoint, IncidentLocation, IncidentRecord, IncidentStatus, Timestamp};
pub use escalation::{
    actions, escalation_alerts, evaluate, timeline, urgency_score, AlertUrgency, EscalationAlert,
    EscalationLevel, EscalationState, EscalationTimeline, LevelStatus, NextEscalation,
    TimelineEntry, ESCALATION_LEVELS,
};
pub use import::{IncidentCsvImporter, IncidentImportError};
pub use overload::{
    cluster_incidents, detect_overload_zones, mutual_aid_suggestions, resource_utilization,
    IncidentCluster, MutualAidKind, MutualAidSuggestion, OverloadConfig, OverloadDetector,
    OverloadReport, OverloadZone, ResourceCounts, ResourceKind, ResourceUtilization,
    SeverityBreakdown, SystemAlert, SystemAlertKind, SystemAlertSeverity, SystemStatus, UtilizationEntry,
    UtilizationStatus, ZoneMutualAid, ZoneSeverity,
};
pub use repository::{IncidentSource, SourceError};
pub use router::coordination_router;
pub use service::{CoordinationError, CoordinationService, CoordinationSnapshot};
