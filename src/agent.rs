//! Agent orchestration
//!
//! A `ReasoningEngine` turns one user message, plus the session history,
//! into an answer. The production engine drives a hosted LLM through a
//! bounded tool-calling loop; the rule engine answers from keyword routing
//! alone and needs no credentials.

mod executor;
mod rules;
#[cfg(test)]
pub mod testing;

pub use executor::{EngineConfig, ToolCallingEngine};
pub use rules::RuleEngine;

use crate::llm::LlmError;
use crate::memory::ConversationTurn;
use crate::tools::ToolInvocation;
use async_trait::async_trait;
use thiserror::Error;

/// Everything an engine sees for one exchange
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub system_instructions: String,
    /// Prior turns, oldest first
    pub history: Vec<ConversationTurn>,
    pub user_message: String,
}

/// Final answer plus the tool calls that produced it
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub steps: Vec<ToolInvocation>,
    pub iterations: u32,
    /// True when the loop stopped at the iteration cap and `text` is best-effort
    pub hit_iteration_cap: bool,
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM service unavailable: {0}")]
    ExternalService(#[from] LlmError),
}

#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    async fn run(&self, ctx: AgentContext) -> Result<Answer, AgentError>;

    /// Short engine name for logs
    fn name(&self) -> &str;
}
