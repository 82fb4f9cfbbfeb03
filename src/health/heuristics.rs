//! Keyword stress scoring and energy-based activity suggestions

use super::{split_fields, ToolInputError};

/// Words that indicate stress. Each one counts at most once per text.
pub const STRESS_KEYWORDS: &[&str] = &[
    "overwhelmed",
    "anxious",
    "tired",
    "sleepless",
    "worried",
    "pressure",
];

/// Energy vocabulary → band
pub const ENERGY_BANDS: &[(&str, EnergyBand)] = &[
    ("tired", EnergyBand::Low),
    ("low", EnergyBand::Low),
    ("okay", EnergyBand::Moderate),
    ("moderate", EnergyBand::Moderate),
    ("good", EnergyBand::High),
    ("high", EnergyBand::High),
    ("energetic", EnergyBand::High),
];

const LOW_ENERGY_ACTIVITIES: [&str; 4] = [
    "gentle breathing exercises",
    "light stretching",
    "meditation",
    "journaling",
];

const MODERATE_ENERGY_ACTIVITIES: [&str; 4] =
    ["short walk", "yoga", "creative activities", "reading"];

const HIGH_ENERGY_ACTIVITIES: [&str; 4] = [
    "exercise",
    "dancing",
    "outdoor activities",
    "social activities",
];

/// Assessed stress level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

impl StressLevel {
    fn from_count(count: usize) -> Self {
        match count {
            0 | 1 => Self::Low,
            2 | 3 => Self::Moderate,
            _ => Self::High,
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Self::High => "High stress level detected. Consider relaxation techniques and professional support.",
            Self::Moderate => "Moderate stress level. Practice mindfulness and stress management.",
            Self::Low => "Low stress level. Continue maintaining healthy habits.",
        }
    }
}

/// Score free text by counting distinct stress keywords it contains.
///
/// Matching is case-insensitive substring containment, so "tiredness"
/// counts as "tired".
pub fn assess_stress(text: &str) -> StressLevel {
    let lowered = text.to_lowercase();
    let count = STRESS_KEYWORDS
        .iter()
        .filter(|keyword| lowered.contains(*keyword))
        .count();
    StressLevel::from_count(count)
}

/// Energy band driving activity suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyBand {
    Low,
    Moderate,
    High,
}

impl EnergyBand {
    /// Unrecognized words map to `Moderate`.
    pub fn from_token(token: &str) -> Self {
        let normalized = token.trim().to_lowercase();
        ENERGY_BANDS
            .iter()
            .find(|(word, _)| *word == normalized)
            .map_or(EnergyBand::Moderate, |(_, band)| *band)
    }

    pub fn activities(self) -> [&'static str; 4] {
        match self {
            Self::Low => LOW_ENERGY_ACTIVITIES,
            Self::Moderate => MODERATE_ENERGY_ACTIVITIES,
            Self::High => HIGH_ENERGY_ACTIVITIES,
        }
    }
}

/// Suggest wellness activities for an energy level.
///
/// `mood` is part of the tool contract but does not influence the result.
pub fn suggest_activities(_mood: &str, energy: &str) -> [&'static str; 4] {
    EnergyBand::from_token(energy).activities()
}

/// Parse `mood,energy_level`
pub fn parse_wellness_input(raw: &str) -> Result<(&str, &str), ToolInputError> {
    let fields = split_fields(raw, 2, "mood,energy_level")?;
    Ok((fields[0], fields[1]))
}
