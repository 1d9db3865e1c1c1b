use serde::{Deserialize, Serialize};

use super::domain::{IncidentType, Severity};

/// Dispatch priority of a resource line or a follow-up recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourcePriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequirement {
    pub kind: String,
    pub quantity: u32,
    pub priority: ResourcePriority,
}

impl ResourceRequirement {
    fn new(kind: &str, quantity: u32, priority: ResourcePriority) -> Self {
        Self {
            kind: kind.to_string(),
            quantity,
            priority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyItem {
    pub name: String,
    pub quantity: u32,
}

fn supplies(items: &[(&str, u32)]) -> Vec<SupplyItem> {
    items
        .iter()
        .map(|(name, quantity)| SupplyItem {
            name: (*name).to_string(),
            quantity: *quantity,
        })
        .collect()
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

/// Resource allocation recommended for an incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePlan {
    pub resources: Vec<ResourceRequirement>,
    pub required_personnel: u32,
    pub estimated_response_minutes: u32,
    pub confidence: u8,
    pub supplies: Vec<SupplyItem>,
    pub recommendations: Vec<String>,
    pub risk_narrative: String,
}

/// Type-specific portion of a plan before severity-only fields are attached.
struct BranchPlan {
    resources: Vec<ResourceRequirement>,
    personnel: u32,
    response_minutes: u32,
    supplies: Vec<SupplyItem>,
    recommendations: Vec<String>,
}

/// Build the resource plan for an incident.
///
/// `severity` is `None` when the caller could not supply a recognized value;
/// branches then behave as non-critical and the plan reports confidence 70.
pub fn plan(kind: IncidentType, severity: Option<Severity>, description: &str) -> ResourcePlan {
    let text = description.to_lowercase();
    let critical = severity == Some(Severity::Critical);

    let branch = match kind {
        IncidentType::Medical => medical_plan(critical, &text),
        IncidentType::Fire => fire_plan(critical, &text),
        IncidentType::Accident => accident_plan(critical, &text),
        IncidentType::Flood => flood_plan(critical),
        IncidentType::Police => police_plan(critical, &text),
        IncidentType::Other => default_plan(),
    };

    ResourcePlan {
        resources: branch.resources,
        required_personnel: branch.personnel,
        estimated_response_minutes: branch.response_minutes,
        confidence: plan_confidence(severity),
        supplies: branch.supplies,
        recommendations: branch.recommendations,
        risk_narrative: risk_narrative(severity).to_string(),
    }
}

fn medical_plan(critical: bool, text: &str) -> BranchPlan {
    let mut resources = vec![ResourceRequirement::new(
        "Ambulance",
        if critical { 2 } else { 1 },
        ResourcePriority::High,
    )];

    let (personnel, kit) = if critical || text.contains("cardiac") || text.contains("stroke") {
        resources.push(ResourceRequirement::new(
            "Advanced Life Support Unit",
            1,
            ResourcePriority::Critical,
        ));
        (
            6,
            supplies(&[("Defibrillator", 1), ("IV Kit", 2), ("Oxygen", 2)]),
        )
    } else {
        (3, supplies(&[("First Aid Kit", 2), ("Stretcher", 1)]))
    };

    BranchPlan {
        resources,
        personnel,
        response_minutes: if critical { 4 } else { 7 },
        supplies: kit,
        recommendations: lines(&[
            "Dispatch nearest available unit",
            "Alert receiving hospital",
            "Prepare trauma bay if critical",
        ]),
    }
}

fn fire_plan(critical: bool, text: &str) -> BranchPlan {
    let mut resources = vec![
        ResourceRequirement::new(
            "Fire Engine",
            if critical { 3 } else { 2 },
            ResourcePriority::Critical,
        ),
        ResourceRequirement::new("Ladder Truck", 1, ResourcePriority::High),
    ];

    let personnel = if critical || text.contains("trapped") {
        resources.push(ResourceRequirement::new(
            "Rescue Squad",
            1,
            ResourcePriority::Critical,
        ));
        resources.push(ResourceRequirement::new("Ambulance", 2, ResourcePriority::High));
        20
    } else {
        12
    };

    BranchPlan {
        resources,
        personnel,
        response_minutes: if critical { 5 } else { 8 },
        supplies: supplies(&[
            ("Fire Hose", 4),
            ("Breathing Apparatus", 6),
            ("Thermal Camera", 2),
        ]),
        recommendations: lines(&[
            "Establish incident command",
            "Notify utility companies",
            "Stage EMS for standby",
            "Request additional units if structure fire",
        ]),
    }
}

fn accident_plan(critical: bool, text: &str) -> BranchPlan {
    let mut resources = vec![
        ResourceRequirement::new("Police Unit", 2, ResourcePriority::High),
        ResourceRequirement::new(
            "Ambulance",
            if critical { 2 } else { 1 },
            ResourcePriority::High,
        ),
    ];

    // Extrication only depends on the description, not the severity.
    let personnel = if text.contains("trapped") || text.contains("extrication") {
        resources.push(ResourceRequirement::new(
            "Fire/Rescue",
            1,
            ResourcePriority::Critical,
        ));
        10
    } else {
        6
    };

    BranchPlan {
        resources,
        personnel,
        response_minutes: if critical { 5 } else { 9 },
        supplies: supplies(&[("Traffic Cones", 10), ("First Aid Kit", 2), ("Flares", 6)]),
        recommendations: lines(&[
            "Secure accident scene",
            "Request tow service",
            "Document scene for investigation",
        ]),
    }
}

fn flood_plan(critical: bool) -> BranchPlan {
    BranchPlan {
        resources: vec![
            ResourceRequirement::new(
                "Water Rescue Team",
                if critical { 2 } else { 1 },
                ResourcePriority::Critical,
            ),
            ResourceRequirement::new("Evacuation Bus", 1, ResourcePriority::High),
        ],
        personnel: if critical { 15 } else { 8 },
        response_minutes: 10,
        supplies: supplies(&[
            ("Life Jackets", 20),
            ("Rope/Throw Bag", 10),
            ("Emergency Blankets", 30),
        ]),
        recommendations: lines(&[
            "Activate flood emergency protocol",
            "Coordinate with Red Cross",
            "Monitor water levels",
            "Prepare emergency shelter",
        ]),
    }
}

fn police_plan(critical: bool, text: &str) -> BranchPlan {
    let mut resources = vec![ResourceRequirement::new(
        "Police Unit",
        if critical { 4 } else { 2 },
        ResourcePriority::Critical,
    )];

    let personnel = if critical || text.contains("weapon") || text.contains("armed") {
        resources.push(ResourceRequirement::new(
            "SWAT/Tactical Unit",
            1,
            ResourcePriority::Critical,
        ));
        20
    } else {
        4
    };

    BranchPlan {
        resources,
        personnel,
        response_minutes: if critical { 3 } else { 6 },
        supplies: supplies(&[("Body Armor", 4), ("First Aid Kit", 2)]),
        recommendations: lines(&[
            "Establish perimeter",
            "Gather witness information",
            "Request backup if armed suspect",
        ]),
    }
}

fn default_plan() -> BranchPlan {
    BranchPlan {
        resources: vec![ResourceRequirement::new(
            "First Responder",
            1,
            ResourcePriority::Medium,
        )],
        personnel: 2,
        response_minutes: 10,
        supplies: supplies(&[("First Aid Kit", 1)]),
        recommendations: lines(&["Assess situation on arrival"]),
    }
}

fn plan_confidence(severity: Option<Severity>) -> u8 {
    let multiplier = match severity {
        Some(Severity::Critical) => 1.0,
        Some(Severity::High) => 0.85,
        Some(Severity::Medium) | None => 0.7,
        Some(Severity::Low) => 0.5,
    };
    (multiplier * 100.0_f64).round() as u8
}

/// Fixed narrative per severity band; absent severity reads as low risk.
pub fn risk_narrative(severity: Option<Severity>) -> &'static str {
    match severity {
        Some(Severity::Critical) => {
            "HIGH RISK - Immediate action required. Multiple resources recommended."
        }
        Some(Severity::High) => {
            "ELEVATED RISK - Priority response needed. Monitor for escalation."
        }
        Some(Severity::Medium) => "MODERATE RISK - Standard response protocol. Assess on arrival.",
        Some(Severity::Low) | None => "LOW RISK - Routine response. Single unit may suffice.",
    }
}
