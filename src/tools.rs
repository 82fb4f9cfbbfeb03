//! Tools exposed to the agent
//!
//! Every tool takes a single free-text argument and answers with text. A
//! tool never fails the request: bad input comes back as an error output
//! the agent can read and react to.

mod bmi;
mod calories;
mod research;
mod stress;
mod wellness;

pub use bmi::BmiTool;
pub use calories::CalorieTool;
pub use research::{DuckDuckGoSearch, HealthResearchTool, SearchBackend, SearchError};
pub use stress::StressTool;
pub use wellness::WellnessTool;

use crate::llm::ToolDefinition;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Result from tool execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    pub output: String,
}

impl ToolOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: message.into(),
        }
    }
}

/// Record of one tool call made while answering a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub raw_input: String,
    pub output_text: String,
    pub succeeded: bool,
}

/// Trait for tools that can be executed by the agent
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name, unique within a registry
    fn name(&self) -> &str;

    /// When to use the tool, for the model's tool selection
    fn description(&self) -> String;

    /// Format of the single text argument
    fn input_format(&self) -> &str;

    /// JSON schema for tool input
    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["input"],
            "properties": {
                "input": {
                    "type": "string",
                    "description": self.input_format()
                }
            }
        })
    }

    /// Execute the tool on its raw text argument
    async fn run(&self, input: &str) -> ToolOutput;
}

/// Pull the text argument out of whatever JSON the model produced.
///
/// `{"input": "..."}` and bare strings are taken as-is; anything else is
/// passed along serialized so the tool can report why it is wrong.
pub fn raw_text(input: &Value) -> String {
    match input {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("input") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => input.to_string(),
        },
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Immutable set of tools, looked up by exact name
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// The health tool set backed by the given search provider
    pub fn standard(search: Arc<dyn SearchBackend>) -> Self {
        Self::new(vec![
            Arc::new(BmiTool),
            Arc::new(CalorieTool),
            Arc::new(StressTool),
            Arc::new(WellnessTool),
            Arc::new(HealthResearchTool::new(search)),
        ])
    }

    /// Build a registry. On duplicate names the first registration wins.
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        let mut kept: Vec<Arc<dyn Tool>> = Vec::with_capacity(tools.len());
        let mut by_name = HashMap::with_capacity(tools.len());
        for tool in tools {
            if by_name.contains_key(tool.name()) {
                tracing::warn!(tool = tool.name(), "Duplicate tool name ignored");
                continue;
            }
            by_name.insert(tool.name().to_string(), kept.len());
            kept.push(tool);
        }
        Self {
            tools: kept,
            by_name,
        }
    }

    /// Get all tool definitions for LLM, in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    /// Tools in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.by_name.get(name).map(|&i| &self.tools[i])
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name with the model's JSON arguments
    pub async fn execute(&self, name: &str, input: &Value) -> Option<ToolInvocation> {
        self.invoke(name, &raw_text(input)).await
    }

    /// Execute a tool by name with a text argument
    pub async fn invoke(&self, name: &str, raw_input: &str) -> Option<ToolInvocation> {
        let tool = self.get(name)?;
        let output = tool.run(raw_input).await;
        tracing::info!(
            tool = name,
            success = output.success,
            "Tool invoked"
        );
        Some(ToolInvocation {
            tool_name: name.to_string(),
            raw_input: raw_input.to_string(),
            output_text: output.output,
            succeeded: output.success,
        })
    }
}
