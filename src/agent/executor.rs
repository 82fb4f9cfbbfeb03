//! Bounded tool-calling loop over a hosted model

use super::{AgentContext, AgentError, Answer, ReasoningEngine};
use crate::llm::{
    ContentBlock, LlmError, LlmMessage, LlmRequest, LlmResponse, LlmService, MessageRole,
    SystemContent,
};
use crate::memory::Role;
use crate::tools::{raw_text, ToolInvocation, ToolRegistry};
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const CORRECTIVE_PROMPT: &str = "Your last reply was empty. Either call one of the available tools or answer the user directly in plain text.";

const FALLBACK_ANSWER: &str = "I'm sorry, I wasn't able to work out an answer to that. Could you rephrase your question or give me a bit more detail?";

/// Loop limits and sampling parameters
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_iterations: u32,
    /// Attempts per model call, including the first
    pub max_llm_attempts: u32,
    pub retry_base_delay: Duration,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            max_llm_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
            max_tokens: Some(2048),
            temperature: Some(0.3),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_iterations: env_or("AGENT_MAX_ITERATIONS", defaults.max_iterations).max(1),
            max_llm_attempts: env_or("AGENT_MAX_LLM_ATTEMPTS", defaults.max_llm_attempts).max(1),
            temperature: Some(env_or("LLM_TEMPERATURE", 0.3)),
            ..defaults
        }
    }

    /// Exponential backoff: base, 2x base, 4x base, ...
    fn retry_delay(&self, attempt: u32) -> Duration {
        self.retry_base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Production engine: the model picks tools, the registry runs them
pub struct ToolCallingEngine {
    llm: Arc<dyn LlmService>,
    tools: Arc<ToolRegistry>,
    config: EngineConfig,
}

impl ToolCallingEngine {
    pub fn new(llm: Arc<dyn LlmService>, tools: Arc<ToolRegistry>, config: EngineConfig) -> Self {
        Self { llm, tools, config }
    }

    fn initial_messages(ctx: &AgentContext) -> Vec<LlmMessage> {
        let mut messages: Vec<LlmMessage> = ctx
            .history
            .iter()
            .map(|turn| match turn.role {
                Role::User => LlmMessage::user_text(&turn.text),
                Role::Agent => LlmMessage::assistant_text(&turn.text),
            })
            .collect();
        messages.push(LlmMessage::user_text(&ctx.user_message));
        messages
    }

    async fn complete_with_retry(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let mut attempt = 1;
        loop {
            match self.llm.complete(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.kind.is_retryable() && attempt < self.config.max_llm_attempts => {
                    let delay = self.config.retry_delay(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = %delay.as_millis(),
                        error = %e,
                        "Retrying LLM request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn run_tool(&self, name: &str, input: &serde_json::Value) -> ToolInvocation {
        if let Some(invocation) = self.tools.execute(name, input).await {
            return invocation;
        }
        tracing::warn!(tool = name, "Model requested an unknown tool");
        ToolInvocation {
            tool_name: name.to_string(),
            raw_input: raw_text(input),
            output_text: format!("Unknown tool: {name}"),
            succeeded: false,
        }
    }

    /// Answer used when the cap is reached without a final reply
    fn best_effort(last_text: Option<String>, steps: &[ToolInvocation]) -> String {
        if let Some(text) = last_text {
            return text;
        }
        match steps.last() {
            Some(step) if step.succeeded => format!("Here is what I found: {}", step.output_text),
            _ => FALLBACK_ANSWER.to_string(),
        }
    }
}

#[async_trait]
impl ReasoningEngine for ToolCallingEngine {
    async fn run(&self, ctx: AgentContext) -> Result<Answer, AgentError> {
        let system = vec![SystemContent::new(ctx.system_instructions.clone())];
        let definitions = self.tools.definitions();
        let mut messages = Self::initial_messages(&ctx);
        let mut steps: Vec<ToolInvocation> = Vec::new();
        let mut last_text: Option<String> = None;

        for iteration in 1..=self.config.max_iterations {
            let request = LlmRequest {
                system: system.clone(),
                messages: messages.clone(),
                tools: definitions.clone(),
                max_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            };
            let response = self.complete_with_retry(&request).await?;

            let full_text = response.text();
            let text = full_text.trim();
            let tool_uses = response.tool_uses();

            if let Some(&(id, name, input)) = tool_uses.first() {
                if tool_uses.len() > 1 {
                    tracing::debug!(
                        dropped = tool_uses.len() - 1,
                        "Only the first tool call is executed"
                    );
                }

                let invocation = self.run_tool(name, input).await;

                let mut assistant = Vec::new();
                if !text.is_empty() {
                    assistant.push(ContentBlock::text(text));
                    last_text = Some(text.to_string());
                }
                assistant.push(ContentBlock::tool_use(id, name, input.clone()));
                messages.push(LlmMessage {
                    role: MessageRole::Assistant,
                    content: assistant,
                });
                messages.push(LlmMessage {
                    role: MessageRole::User,
                    content: vec![ContentBlock::tool_result(
                        id,
                        invocation.output_text.clone(),
                        !invocation.succeeded,
                    )],
                });
                steps.push(invocation);
                continue;
            }

            if !text.is_empty() {
                return Ok(Answer {
                    text: text.to_string(),
                    steps,
                    iterations: iteration,
                    hit_iteration_cap: false,
                });
            }

            tracing::warn!(iteration, "Model reply had neither text nor a tool call");
            // The last message is always the user's side of the exchange
            if let Some(last) = messages.last_mut() {
                last.content.push(ContentBlock::text(CORRECTIVE_PROMPT));
            }
        }

        tracing::info!(
            max_iterations = self.config.max_iterations,
            steps = steps.len(),
            "Iteration cap reached, returning best-effort answer"
        );
        let text = Self::best_effort(last_text, &steps);
        Ok(Answer {
            text,
            steps,
            iterations: self.config.max_iterations,
            hit_iteration_cap: true,
        })
    }

    fn name(&self) -> &str {
        "tool_calling"
    }
}
