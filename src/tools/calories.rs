//! Daily calorie needs tool

use super::{Tool, ToolOutput};
use crate::health::{daily_calories, parse_calorie_input};
use async_trait::async_trait;

pub struct CalorieTool;

#[async_trait]
impl Tool for CalorieTool {
    fn name(&self) -> &'static str {
        "Calorie_Calculator"
    }

    fn description(&self) -> String {
        "Calculate daily calorie needs when given age,weight,height,gender,activity_level separated by commas. Weight in kg, height in cm; activity_level is one of sedentary, light, moderate, active, very_active.".to_string()
    }

    fn input_format(&self) -> &'static str {
        "age,weight_kg,height_cm,gender,activity_level, e.g. \"25,70,175,male,moderate\""
    }

    async fn run(&self, input: &str) -> ToolOutput {
        match parse_calorie_input(input) {
            Ok(c) => {
                let calories =
                    daily_calories(c.age, c.weight_kg, c.height_cm, c.sex, c.activity);
                ToolOutput::success(format!("Recommended daily calories: {calories:.0}"))
            }
            Err(e) => ToolOutput::error(format!("Invalid input: {e}")),
        }
    }
}
