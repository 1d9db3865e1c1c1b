//! Spatial clustering of active incidents and resource-utilization checks.
//!
//! Clustering is a greedy single pass in input order: each unclustered incident
//! seeds a cluster and absorbs later incidents within the radius of the
//! cluster's running centroid. Reordering the input can change the clusters.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{GeoPoint, IncidentRecord};
use super::geo::{centroid, haversine_miles};
use crate::triage::domain::{IncidentType, Severity};
use crate::triage::resources::ResourcePriority;

const MIN_ZONE_RADIUS_MILES: f64 = 0.5;
const STAGING_INCIDENT_COUNT: usize = 4;
const PERIMETER_INCIDENT_COUNT: usize = 3;
const CRITICAL_MEMBERS_FOR_CRITICAL_ZONE: usize = 2;
const HIGH_MEMBERS_FOR_HIGH_ZONE: usize = 2;

/// Thresholds steering clustering and utilization grading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverloadConfig {
    pub cluster_radius_miles: f64,
    pub overload_threshold: usize,
    pub critical_overload_threshold: usize,
    pub stretch_threshold: f64,
    pub critical_stretch_threshold: f64,
}

impl Default for OverloadConfig {
    fn default() -> Self {
        Self {
            cluster_radius_miles: 2.0,
            overload_threshold: 3,
            critical_overload_threshold: 5,
            stretch_threshold: 0.7,
            critical_stretch_threshold: 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Ambulance,
    Fire,
    Police,
    Rescue,
}

impl ResourceKind {
    pub const ALL: [Self; 4] = [Self::Ambulance, Self::Fire, Self::Police, Self::Rescue];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ambulance => "ambulance",
            Self::Fire => "fire",
            Self::Police => "police",
            Self::Rescue => "rescue",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit counts per resource kind. Missing kinds deserialize as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceCounts {
    pub ambulance: u32,
    pub fire: u32,
    pub police: u32,
    pub rescue: u32,
}

impl ResourceCounts {
    pub const DEFAULT_CAPACITY: Self = Self {
        ambulance: 6,
        fire: 4,
        police: 8,
        rescue: 2,
    };

    pub const fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Ambulance => self.ambulance,
            ResourceKind::Fire => self.fire,
            ResourceKind::Police => self.police,
            ResourceKind::Rescue => self.rescue,
        }
    }

    fn slot(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Ambulance => &mut self.ambulance,
            ResourceKind::Fire => &mut self.fire,
            ResourceKind::Police => &mut self.police,
            ResourceKind::Rescue => &mut self.rescue,
        }
    }

    pub fn total(&self) -> u32 {
        ResourceKind::ALL.iter().map(|kind| self.get(*kind)).sum()
    }
}

/// Units a single incident of this type needs before the severity multiplier.
const fn base_allocation(kind: IncidentType) -> ResourceCounts {
    let zero = ResourceCounts {
        ambulance: 0,
        fire: 0,
        police: 0,
        rescue: 0,
    };
    match kind {
        IncidentType::Medical => ResourceCounts {
            ambulance: 1,
            ..zero
        },
        IncidentType::Fire => ResourceCounts {
            ambulance: 1,
            fire: 2,
            ..zero
        },
        IncidentType::Accident => ResourceCounts {
            ambulance: 1,
            police: 1,
            ..zero
        },
        IncidentType::Police => ResourceCounts { police: 2, ..zero },
        IncidentType::Flood => ResourceCounts { rescue: 1, ..zero },
        IncidentType::Other => ResourceCounts { police: 1, ..zero },
    }
}

fn severity_multiplier(severity: Severity) -> f64 {
    match severity {
        Severity::Critical => 2.0,
        Severity::High => 1.5,
        Severity::Medium | Severity::Low => 1.0,
    }
}

/// Sum of per-incident allocations, each term rounded up after the multiplier.
pub fn required_resources<'a, I>(incidents: I) -> ResourceCounts
where
    I: IntoIterator<Item = &'a IncidentRecord>,
{
    let mut required = ResourceCounts::default();
    for incident in incidents {
        let allocation = base_allocation(incident.incident_type);
        let multiplier = severity_multiplier(incident.severity_or_medium());
        for kind in ResourceKind::ALL {
            let units = f64::from(allocation.get(kind)) * multiplier;
            *required.slot(kind) += units.ceil() as u32;
        }
    }
    required
}

/// A greedy spatial cluster; members are indices into the evaluated slice.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentCluster {
    pub id: String,
    pub member_indices: Vec<usize>,
    pub center: GeoPoint,
    pub radius_miles: f64,
}

/// Cluster active incidents with coordinates. See the module docs for ordering.
pub fn cluster_incidents(incidents: &[IncidentRecord], radius_miles: f64) -> Vec<IncidentCluster> {
    let candidates: Vec<(usize, GeoPoint)> = incidents
        .iter()
        .enumerate()
        .filter(|(_, incident)| incident.status.is_active())
        .filter_map(|(index, incident)| incident.coordinates().map(|point| (index, point)))
        .collect();

    let mut clustered = vec![false; candidates.len()];
    let mut clusters = Vec::new();

    for seed in 0..candidates.len() {
        if clustered[seed] {
            continue;
        }
        clustered[seed] = true;

        let (seed_index, seed_point) = candidates[seed];
        let mut members = vec![seed_index];
        let mut points = vec![seed_point];
        let mut center = seed_point;

        for other in 0..candidates.len() {
            if clustered[other] {
                continue;
            }
            let (index, point) = candidates[other];
            if haversine_miles(center, point) <= radius_miles {
                clustered[other] = true;
                members.push(index);
                points.push(point);
                center = centroid(&points).unwrap_or(center);
            }
        }

        let radius = points
            .iter()
            .map(|point| haversine_miles(center, *point))
            .fold(0.0_f64, f64::max);

        clusters.push(IncidentCluster {
            id: format!("cluster-{}", clusters.len() + 1),
            member_indices: members,
            center,
            radius_miles: radius,
        });
    }

    clusters
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneSeverity {
    Elevated,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityBreakdown {
    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverloadZone {
    pub id: String,
    pub center: GeoPoint,
    pub radius_miles: f64,
    pub incident_count: usize,
    pub incident_ids: Vec<String>,
    pub severity: ZoneSeverity,
    pub severity_breakdown: SeverityBreakdown,
    pub required_resources: ResourceCounts,
    pub area_name: String,
}

fn area_name(incident: Option<&IncidentRecord>) -> String {
    incident
        .and_then(IncidentRecord::display_address)
        .and_then(|address| address.split(',').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("Unknown Area")
        .to_string()
}

/// Clusters holding at least `overload_threshold` incidents, as overload zones.
pub fn detect_overload_zones(incidents: &[IncidentRecord], config: &OverloadConfig) -> Vec<OverloadZone> {
    cluster_incidents(incidents, config.cluster_radius_miles)
        .into_iter()
        .filter(|cluster| cluster.member_indices.len() >= config.overload_threshold)
        .map(|cluster| {
            let members: Vec<&IncidentRecord> = cluster
                .member_indices
                .iter()
                .filter_map(|index| incidents.get(*index))
                .collect();

            let mut breakdown = SeverityBreakdown::default();
            for member in &members {
                breakdown.record(member.severity_or_medium());
            }

            let count = members.len();
            let severity = if count >= config.critical_overload_threshold
                || breakdown.critical >= CRITICAL_MEMBERS_FOR_CRITICAL_ZONE
            {
                ZoneSeverity::Critical
            } else if breakdown.critical >= 1 || breakdown.high >= HIGH_MEMBERS_FOR_HIGH_ZONE {
                ZoneSeverity::High
            } else {
                ZoneSeverity::Elevated
            };

            OverloadZone {
                id: cluster.id,
                center: cluster.center,
                radius_miles: cluster.radius_miles.max(MIN_ZONE_RADIUS_MILES),
                incident_count: count,
                incident_ids: members.iter().map(|member| member.id.clone()).collect(),
                severity,
                severity_breakdown: breakdown,
                required_resources: required_resources(members.iter().copied()),
                area_name: area_name(members.first().copied()),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationStatus {
    Normal,
    Stretched,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilizationEntry {
    pub capacity: u32,
    pub deployed: u32,
    pub available: u32,
    pub ratio: f64,
    pub status: UtilizationStatus,
}

impl UtilizationEntry {
    fn grade(capacity: u32, deployed: u32, config: &OverloadConfig) -> Self {
        let ratio = if capacity == 0 {
            0.0
        } else {
            f64::from(deployed) / f64::from(capacity)
        };
        let status = if ratio >= config.critical_stretch_threshold {
            UtilizationStatus::Critical
        } else if ratio >= config.stretch_threshold {
            UtilizationStatus::Stretched
        } else {
            UtilizationStatus::Normal
        };
        Self {
            capacity,
            deployed,
            available: capacity.saturating_sub(deployed),
            ratio,
            status,
        }
    }

    pub fn percent(&self) -> i64 {
        (self.ratio * 100.0).round() as i64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUtilization {
    pub by_type: BTreeMap<ResourceKind, UtilizationEntry>,
    pub overall: UtilizationEntry,
}

impl ResourceUtilization {
    pub fn available(&self, kind: ResourceKind) -> u32 {
        self.by_type
            .get(&kind)
            .map(|entry| entry.available)
            .unwrap_or(0)
    }
}

pub fn resource_utilization(
    capacity: &ResourceCounts,
    deployed: &ResourceCounts,
    config: &OverloadConfig,
) -> ResourceUtilization {
    let by_type = ResourceKind::ALL
        .iter()
        .map(|kind| {
            let entry = UtilizationEntry::grade(capacity.get(*kind), deployed.get(*kind), config);
            (*kind, entry)
        })
        .collect();
    let overall = UtilizationEntry::grade(capacity.total(), deployed.total(), config);
    ResourceUtilization { by_type, overall }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutualAidKind {
    ResourceRequest,
    Staging,
    Backup,
    Perimeter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutualAidSuggestion {
    pub kind: MutualAidKind,
    pub priority: ResourcePriority,
    pub title: String,
    pub description: String,
    pub action: String,
}

impl MutualAidSuggestion {
    fn new(
        kind: MutualAidKind,
        priority: ResourcePriority,
        title: &str,
        description: String,
        action: String,
    ) -> Self {
        Self {
            kind,
            priority,
            title: title.to_string(),
            description,
            action,
        }
    }
}

/// Suggestions for one zone, in shortfall, staging, backup, perimeter order.
pub fn mutual_aid_suggestions(
    zone: &OverloadZone,
    utilization: &ResourceUtilization,
) -> Vec<MutualAidSuggestion> {
    let mut suggestions = Vec::new();

    let shortfall: Vec<String> = ResourceKind::ALL
        .iter()
        .filter_map(|kind| {
            let required = zone.required_resources.get(*kind);
            let available = utilization.available(*kind);
            (required > available).then(|| format!("{} {}", required - available, kind))
        })
        .collect();
    if !shortfall.is_empty() {
        suggestions.push(MutualAidSuggestion::new(
            MutualAidKind::ResourceRequest,
            ResourcePriority::High,
            "Request Additional Resources",
            format!("Shortfall detected: {}", shortfall.join(", ")),
            "Contact neighboring jurisdictions for mutual aid".to_string(),
        ));
    }

    if zone.incident_count >= STAGING_INCIDENT_COUNT {
        suggestions.push(MutualAidSuggestion::new(
            MutualAidKind::Staging,
            ResourcePriority::High,
            "Establish Staging Area",
            format!("{} active incidents in cluster", zone.incident_count),
            format!("Set up command post near {}", zone.area_name),
        ));
    }

    if zone.severity == ZoneSeverity::Critical {
        suggestions.push(MutualAidSuggestion::new(
            MutualAidKind::Backup,
            ResourcePriority::Critical,
            "Activate Emergency Backup",
            "Critical overload zone detected".to_string(),
            "Activate off-duty personnel and reserve units".to_string(),
        ));
    }

    if zone.incident_count >= PERIMETER_INCIDENT_COUNT {
        suggestions.push(MutualAidSuggestion::new(
            MutualAidKind::Perimeter,
            ResourcePriority::Medium,
            "Establish Traffic Perimeter",
            "Multiple incidents may cause congestion".to_string(),
            "Set up traffic control around affected area".to_string(),
        ));
    }

    suggestions
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    Normal,
    Elevated,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemAlertKind {
    Overload,
    Resources,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemAlertSeverity {
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemAlert {
    pub kind: SystemAlertKind,
    pub severity: SystemAlertSeverity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneMutualAid {
    pub zone_id: String,
    pub suggestions: Vec<MutualAidSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverloadReport {
    pub system_status: SystemStatus,
    pub alerts: Vec<SystemAlert>,
    pub overload_zones: Vec<OverloadZone>,
    pub utilization: ResourceUtilization,
    pub mutual_aid: Vec<ZoneMutualAid>,
    pub active_incidents: usize,
}

/// Overload detection bound to a configuration and a capacity table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverloadDetector {
    config: OverloadConfig,
    capacity: ResourceCounts,
}

impl Default for OverloadDetector {
    fn default() -> Self {
        Self::new(OverloadConfig::default(), ResourceCounts::DEFAULT_CAPACITY)
    }
}

impl OverloadDetector {
    pub fn new(config: OverloadConfig, capacity: ResourceCounts) -> Self {
        Self { config, capacity }
    }

    pub fn config(&self) -> &OverloadConfig {
        &self.config
    }

    pub fn capacity(&self) -> &ResourceCounts {
        &self.capacity
    }

    pub fn detect(&self, incidents: &[IncidentRecord], deployed: &ResourceCounts) -> OverloadReport {
        let zones = detect_overload_zones(incidents, &self.config);
        let utilization = resource_utilization(&self.capacity, deployed, &self.config);

        let mut status = SystemStatus::Normal;
        let mut alerts = Vec::new();

        let critical_zones = zones
            .iter()
            .filter(|zone| zone.severity == ZoneSeverity::Critical)
            .count();
        if critical_zones > 0 {
            status = SystemStatus::Critical;
            alerts.push(SystemAlert {
                kind: SystemAlertKind::Overload,
                severity: SystemAlertSeverity::Critical,
                message: format!("{critical_zones} critical overload zone(s) detected"),
            });
        } else if !zones.is_empty() {
            status = SystemStatus::Elevated;
            alerts.push(SystemAlert {
                kind: SystemAlertKind::Overload,
                severity: SystemAlertSeverity::High,
                message: format!("{} overload zone(s) detected", zones.len()),
            });
        }

        match utilization.overall.status {
            UtilizationStatus::Critical => {
                status = SystemStatus::Critical;
                alerts.push(SystemAlert {
                    kind: SystemAlertKind::Resources,
                    severity: SystemAlertSeverity::Critical,
                    message: format!("Resources at {}% capacity", utilization.overall.percent()),
                });
            }
            UtilizationStatus::Stretched => {
                status = status.max(SystemStatus::Elevated);
                alerts.push(SystemAlert {
                    kind: SystemAlertKind::Resources,
                    severity: SystemAlertSeverity::High,
                    message: format!(
                        "Resources stretched at {}% capacity",
                        utilization.overall.percent()
                    ),
                });
            }
            UtilizationStatus::Normal => {}
        }

        let mutual_aid = zones
            .iter()
            .map(|zone| ZoneMutualAid {
                zone_id: zone.id.clone(),
                suggestions: mutual_aid_suggestions(zone, &utilization),
            })
            .collect();

        OverloadReport {
            system_status: status,
            alerts,
            active_incidents: incidents
                .iter()
                .filter(|incident| incident.status.is_active())
                .count(),
            overload_zones: zones,
            utilization,
            mutual_aid,
        }
    }
}
