use super::super::domain::{IncidentType, Severity};

/// Keyword with the rationale surfaced by the explainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeywordRule {
    pub(crate) word: &'static str,
    pub(crate) reason: &'static str,
}

const fn rule(word: &'static str, reason: &'static str) -> KeywordRule {
    KeywordRule { word, reason }
}

pub(crate) const CRITICAL_KEYWORDS: &[KeywordRule] = &[
    rule("fire", "Active fire emergency - life threatening"),
    rule("gun", "Firearm involved - extreme danger"),
    rule("shooter", "Active shooter situation"),
    rule("cardiac", "Cardiac emergency - time critical"),
    rule("stroke", "Stroke symptoms - brain damage risk"),
    rule("explosion", "Explosion detected - mass casualty potential"),
    rule("trapped", "Person trapped - rescue required"),
    rule("unconscious", "Unresponsive victim - immediate care needed"),
    rule("collapse", "Structure/person collapse - entrapment risk"),
    rule("not breathing", "Respiratory failure - CPR needed"),
    rule("dying", "Life-threatening emergency"),
    rule("multiple casualties", "Mass casualty incident"),
    rule("building collapse", "Structural failure - search and rescue"),
    rule("gas leak", "Hazardous gas - explosion/toxicity risk"),
    rule("bomb", "Explosive device - evacuation required"),
];

pub(crate) const HIGH_KEYWORDS: &[KeywordRule] = &[
    rule("accident", "Vehicular/industrial accident"),
    rule("crash", "Vehicle collision detected"),
    rule("blood", "Active bleeding - trauma"),
    rule("injury", "Physical injury reported"),
    rule("broken", "Fracture/structural damage"),
    rule("breathing", "Respiratory distress"),
    rule("severe", "Severity modifier detected"),
    rule("felony", "Felony in progress"),
    rule("assault", "Violent crime in progress"),
    rule("robbery", "Armed/violent theft"),
    rule("drowning", "Water emergency - time critical"),
    rule("choking", "Airway obstruction"),
    rule("chest pain", "Possible cardiac event"),
    rule("fall", "Fall injury - trauma risk"),
    rule("hit by car", "Pedestrian struck"),
];

pub(crate) const MEDIUM_KEYWORDS: &[KeywordRule] = &[
    rule("fight", "Physical altercation"),
    rule("dispute", "Civil dispute/disturbance"),
    rule("minor injury", "Non-life-threatening injury"),
    rule("theft", "Property crime"),
    rule("vandalism", "Property damage"),
    rule("smoke", "Smoke detected - possible fire"),
    rule("alarm", "Alarm activation"),
    rule("suspicious", "Suspicious activity"),
];

/// Keyword table tagged with the severity band it signals.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeywordBand {
    pub(crate) severity: Severity,
    pub(crate) keywords: &'static [KeywordRule],
}

impl KeywordBand {
    /// Substring containment against already lower-cased text.
    pub(crate) fn matches_any(&self, text: &str) -> bool {
        self.keywords.iter().any(|keyword| text.contains(keyword.word))
    }
}

/// Scan order: critical, then high, then medium.
pub(crate) const KEYWORD_BANDS: [KeywordBand; 3] = [
    KeywordBand {
        severity: Severity::Critical,
        keywords: CRITICAL_KEYWORDS,
    },
    KeywordBand {
        severity: Severity::High,
        keywords: HIGH_KEYWORDS,
    },
    KeywordBand {
        severity: Severity::Medium,
        keywords: MEDIUM_KEYWORDS,
    },
];

/// A keyword located in the description, with its character offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LocatedKeyword {
    pub(crate) rule: KeywordRule,
    pub(crate) severity: Severity,
    pub(crate) offset: usize,
}

/// Every match across all bands, in scan order (not yet sorted by offset).
pub(crate) fn locate_keywords(text: &str) -> Vec<LocatedKeyword> {
    let mut located = Vec::new();
    for band in &KEYWORD_BANDS {
        for keyword in band.keywords {
            if let Some(byte_offset) = text.find(keyword.word) {
                located.push(LocatedKeyword {
                    rule: *keyword,
                    severity: band.severity,
                    offset: text[..byte_offset].chars().count(),
                });
            }
        }
    }
    located
}

/// Base score and rationale attached to each incident type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TypeProfile {
    pub(crate) base_score: u8,
    pub(crate) reason: &'static str,
}

pub(crate) const fn type_profile(kind: IncidentType) -> TypeProfile {
    match kind {
        IncidentType::Fire => TypeProfile {
            base_score: 65,
            reason: "Fire incidents have high base priority due to spread risk",
        },
        IncidentType::Medical => TypeProfile {
            base_score: 55,
            reason: "Medical emergencies require rapid response",
        },
        IncidentType::Accident => TypeProfile {
            base_score: 50,
            reason: "Accidents often involve injuries and traffic hazards",
        },
        IncidentType::Police => TypeProfile {
            base_score: 45,
            reason: "Law enforcement situations require coordinated response",
        },
        IncidentType::Flood => TypeProfile {
            base_score: 40,
            reason: "Flood situations require evacuation resources",
        },
        IncidentType::Other => TypeProfile {
            base_score: 25,
            reason: "Unclassified incident - requires assessment",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_keywords_reports_character_offsets() {
        let located = locate_keywords("café fire");
        let fire = located
            .iter()
            .find(|entry| entry.rule.word == "fire")
            .expect("fire located");
        assert_eq!(fire.offset, 5);
        assert_eq!(fire.severity, Severity::Critical);
    }

    #[test]
    fn substring_matching_is_not_word_bounded() {
        // "fall" inside "waterfall" still counts.
        assert!(KEYWORD_BANDS[1].matches_any("waterfall view"));
        assert!(!KEYWORD_BANDS[2].matches_any("quiet street"));
    }

    #[test]
    fn keyword_tables_are_lower_case() {
        for band in &KEYWORD_BANDS {
            for keyword in band.keywords {
                assert_eq!(keyword.word, keyword.word.to_lowercase());
            }
        }
    }
}
