//! System prompt construction with a catalog of the registered tools
//!
//! The base prompt sets the agent's role and tone. The tool catalog lists
//! each tool's exact name and input format so the model passes arguments
//! the calculators can parse.

use crate::tools::ToolRegistry;
use std::fmt::Write;

/// Base system prompt establishing the agent's role
const BASE_PROMPT: &str = r"You are a comprehensive AI Health & Mental Wellbeing Agent. You help users with:

1. HEALTH & FITNESS:
   - Personalized diet and fitness plans
   - BMI calculations and health assessments
   - Calorie recommendations
   - Exercise routines and nutrition advice

2. MENTAL WELLBEING:
   - Stress level assessment
   - Mental health support and guidance
   - Wellness activity suggestions
   - Emotional support and coping strategies

IMPORTANT GUIDELINES:
- Always be empathetic and supportive
- Provide evidence-based advice
- Suggest professional help when needed
- Use tools when specific calculations are required
- Keep responses practical and actionable
- Maintain a caring, professional tone

If users provide personal health data (age, weight, height, etc.), use the appropriate tools to give personalized recommendations.
For mental health concerns, be supportive but always recommend professional help for serious issues.";

const TOOL_USAGE: &str = r#"Call at most one tool per reply. Every tool takes a single "input" string; put all values in it, comma-separated and in the order shown, with no units. If a tool reports "Invalid input", ask the user for the missing or unclear value instead of guessing. When you have what you need, answer the user in plain text."#;

/// Build the complete system prompt for the given tool set.
pub fn build_system_prompt(tools: &ToolRegistry) -> String {
    let mut prompt = String::from(BASE_PROMPT);

    if !tools.is_empty() {
        prompt.push_str("\n\n<available_tools>\n");
        prompt.push_str(TOOL_USAGE);
        prompt.push('\n');
        for tool in tools.iter() {
            let _ = writeln!(
                prompt,
                "\n- **{}**: input is {}",
                tool.name(),
                tool.input_format()
            );
        }
        prompt.push_str("</available_tools>");
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::MockSearchBackend;
    use std::sync::Arc;

    #[test]
    fn test_prompt_lists_every_tool() {
        let tools = ToolRegistry::standard(Arc::new(MockSearchBackend::answering("")));
        let prompt = build_system_prompt(&tools);

        assert!(prompt.starts_with("You are a comprehensive AI Health & Mental Wellbeing Agent."));
        assert!(prompt.contains("<available_tools>"));
        for name in [
            "BMI_Calculator",
            "Calorie_Calculator",
            "Stress_Assessment",
            "Wellness_Activities",
            "Health_Research",
        ] {
            assert!(prompt.contains(&format!("- **{name}**: input is")), "{name} missing");
        }
        assert!(prompt.contains("weight_kg,height_cm"));
    }

    #[test]
    fn test_no_tools_no_catalog() {
        let prompt = build_system_prompt(&ToolRegistry::new(vec![]));
        assert_eq!(prompt, BASE_PROMPT);
    }
}
