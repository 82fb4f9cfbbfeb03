//! Stress assessment tool

use super::{Tool, ToolOutput};
use crate::health::assess_stress;
use async_trait::async_trait;

pub struct StressTool;

#[async_trait]
impl Tool for StressTool {
    fn name(&self) -> &'static str {
        "Stress_Assessment"
    }

    fn description(&self) -> String {
        "Assess stress level based on the user's description of their current state. Pass the user's own words describing how they feel.".to_string()
    }

    fn input_format(&self) -> &'static str {
        "the user's description of how they feel, verbatim"
    }

    async fn run(&self, input: &str) -> ToolOutput {
        ToolOutput::success(assess_stress(input).advice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stress_tool_levels() {
        let out = StressTool
            .run("Work pressure has me worried, anxious and sleepless")
            .await;
        assert!(out.success);
        assert!(out.output.starts_with("High stress level detected"));

        let out = StressTool.run("").await;
        assert!(out.success);
        assert!(out.output.starts_with("Low stress level"));
    }
}
