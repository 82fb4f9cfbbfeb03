//! Wellness activity suggestion tool

use super::{Tool, ToolOutput};
use crate::health::{parse_wellness_input, suggest_activities};
use async_trait::async_trait;

pub struct WellnessTool;

#[async_trait]
impl Tool for WellnessTool {
    fn name(&self) -> &'static str {
        "Wellness_Activities"
    }

    fn description(&self) -> String {
        "Suggest mental wellness activities based on mood and energy level (format: mood,energy_level). Energy words: tired, low, okay, moderate, good, high, energetic.".to_string()
    }

    fn input_format(&self) -> &'static str {
        "mood,energy_level, e.g. \"sad,tired\""
    }

    async fn run(&self, input: &str) -> ToolOutput {
        match parse_wellness_input(input) {
            Ok((mood, energy)) => ToolOutput::success(format!(
                "Based on your energy level, I suggest: {}",
                suggest_activities(mood, energy).join(", ")
            )),
            Err(e) => ToolOutput::error(format!("Invalid input: {e}")),
        }
    }
}
