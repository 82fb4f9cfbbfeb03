//! BMI and daily calorie calculators

use super::{parse_positive, split_fields, ToolInputError};
use std::num::IntErrorKind;
use std::fmt;

/// BMI band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Lower bounds are inclusive: 18.5 is Normal, 25.0 Overweight, 30.0 Obese.
    pub fn from_value(value: f64) -> Self {
        if value < 18.5 {
            Self::Underweight
        } else if value < 25.0 {
            Self::Normal
        } else if value < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal weight",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Computed body mass index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bmi {
    pub value: f64,
    pub category: BmiCategory,
}

impl fmt::Display for Bmi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BMI: {:.1} ({})", self.value, self.category)
    }
}

/// Body mass index from weight in kilograms and height in centimetres.
///
/// Callers are expected to pass positive values; the text parser enforces it.
pub fn bmi(weight_kg: f64, height_cm: f64) -> Bmi {
    let height_m = height_cm / 100.0;
    let value = weight_kg / (height_m * height_m);
    Bmi {
        value,
        category: BmiCategory::from_value(value),
    }
}

/// Parse `weight_kg,height_cm`
pub fn parse_bmi_input(raw: &str) -> Result<(f64, f64), ToolInputError> {
    let fields = split_fields(raw, 2, "weight_kg,height_cm")?;
    let weight = parse_positive("weight_kg", fields[0])?;
    let height = parse_positive("height_cm", fields[1])?;
    Ok((weight, height))
}

/// Sex used by the Mifflin-St Jeor equation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    FemaleOrOther,
}

impl Sex {
    /// Only "male" selects the male constant; anything else falls to the other branch.
    pub fn from_token(token: &str) -> Self {
        if token.trim().eq_ignore_ascii_case("male") {
            Self::Male
        } else {
            Self::FemaleOrOther
        }
    }

    fn bmr_constant(self) -> f64 {
        match self {
            Self::Male => 5.0,
            Self::FemaleOrOther => -161.0,
        }
    }
}

/// Physical activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

/// Token → level lookup
const ACTIVITY_LEVELS: &[(&str, ActivityLevel)] = &[
    ("sedentary", ActivityLevel::Sedentary),
    ("light", ActivityLevel::Light),
    ("moderate", ActivityLevel::Moderate),
    ("active", ActivityLevel::Active),
    ("very_active", ActivityLevel::VeryActive),
];

impl ActivityLevel {
    /// Resolve a free-form token. Unrecognized tokens fall back to
    /// `Sedentary` instead of failing.
    pub fn from_token(token: &str) -> Self {
        let normalized = token.trim().to_lowercase().replace(['-', ' '], "_");
        ACTIVITY_LEVELS
            .iter()
            .find(|(name, _)| *name == normalized)
            .map_or(ActivityLevel::Sedentary, |(_, level)| *level)
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Active => 1.725,
            Self::VeryActive => 1.9,
        }
    }
}

/// Parsed calorie calculator input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalorieInput {
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub sex: Sex,
    pub activity: ActivityLevel,
}

/// Recommended daily calories (Mifflin-St Jeor BMR times activity multiplier)
pub fn daily_calories(
    age: u32,
    weight_kg: f64,
    height_cm: f64,
    sex: Sex,
    activity: ActivityLevel,
) -> f64 {
    let bmr = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age) + sex.bmr_constant();
    bmr * activity.multiplier()
}

/// Parse `age,weight_kg,height_cm,sex,activity_level`
pub fn parse_calorie_input(raw: &str) -> Result<CalorieInput, ToolInputError> {
    let fields = split_fields(raw, 5, "age,weight_kg,height_cm,gender,activity_level")?;

    let age: u32 = fields[0].parse().map_err(|e: std::num::ParseIntError| {
        let value = fields[0].to_string();
        match e.kind() {
            IntErrorKind::PosOverflow => ToolInputError::TooLarge {
                field: "age",
                value,
            },
            _ => ToolInputError::NotANumber {
                field: "age",
                value,
            },
        }
    })?;
    if age == 0 {
        return Err(ToolInputError::OutOfRange {
            field: "age",
            value: fields[0].to_string(),
        });
    }

    let input = CalorieInput {
        age,
        weight_kg: parse_positive("weight_kg", fields[1])?,
        height_cm: parse_positive("height_cm", fields[2])?,
        sex: Sex::from_token(fields[3]),
        activity: ActivityLevel::from_token(fields[4]),
    };

    // Each value can be positive while the combination is not a body
    let calories = daily_calories(
        input.age,
        input.weight_kg,
        input.height_cm,
        input.sex,
        input.activity,
    );
    if calories <= 0.0 {
        return Err(ToolInputError::ImplausibleBody);
    }

    Ok(input)
}
