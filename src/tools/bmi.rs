//! BMI calculator tool

use super::{Tool, ToolOutput};
use crate::health::{bmi, parse_bmi_input};
use async_trait::async_trait;

pub struct BmiTool;

#[async_trait]
impl Tool for BmiTool {
    fn name(&self) -> &'static str {
        "BMI_Calculator"
    }

    fn description(&self) -> String {
        "Calculate BMI when given weight in kg and height in cm. Use this when users ask about BMI or weight status. Input: weight_kg,height_cm (e.g. 70,175).".to_string()
    }

    fn input_format(&self) -> &'static str {
        "weight_kg,height_cm separated by a comma, e.g. \"70,175\""
    }

    async fn run(&self, input: &str) -> ToolOutput {
        match parse_bmi_input(input) {
            Ok((weight, height)) => ToolOutput::success(bmi(weight, height).to_string()),
            Err(e) => ToolOutput::error(format!("Invalid input: {e}")),
        }
    }
}
