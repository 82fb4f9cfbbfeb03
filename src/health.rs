//! Deterministic health calculators and text heuristics
//!
//! Pure functions backing the agent's tools. Each calculator has a typed
//! entry point plus a parser for the comma-separated text the agent sends.

mod calculators;
mod error;
mod heuristics;

#[cfg(test)]
mod proptests;

pub use calculators::{bmi, daily_calories, parse_bmi_input, parse_calorie_input};
pub use error::ToolInputError;
pub use heuristics::{
    assess_stress, parse_wellness_input, suggest_activities, StressLevel, ENERGY_BANDS,
    STRESS_KEYWORDS,
};

/// Split a comma-separated tool argument into trimmed fields, checking the count.
fn split_fields<'a>(
    raw: &'a str,
    expected: usize,
    format: &'static str,
) -> Result<Vec<&'a str>, ToolInputError> {
    let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
    if fields.len() != expected {
        return Err(ToolInputError::WrongFieldCount {
            expected,
            found: fields.len(),
            format,
        });
    }
    Ok(fields)
}

/// Parse a strictly positive, finite number.
fn parse_positive(field: &'static str, token: &str) -> Result<f64, ToolInputError> {
    let value: f64 = token.parse().map_err(|_| ToolInputError::NotANumber {
        field,
        value: token.to_string(),
    })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ToolInputError::OutOfRange {
            field,
            value: token.to_string(),
        });
    }
    Ok(value)
}
