//! Mock implementations for testing
//!
//! These mocks stand in for the hosted model and the search provider so the
//! agent and HTTP layers can be exercised without network access.

use super::{AgentContext, AgentError, Answer, ReasoningEngine};
use crate::llm::{ContentBlock, LlmError, LlmRequest, LlmResponse, LlmService, Usage};
use crate::tools::{SearchBackend, SearchError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Mock LLM Client
// ============================================================================

/// Mock LLM client that returns queued responses
pub struct MockLlmClient {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    model_id: String,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmClient {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: LlmResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for MockLlmClient {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// A final text answer
pub fn text_response(text: &str) -> LlmResponse {
    LlmResponse {
        content: vec![ContentBlock::text(text)],
        end_turn: true,
        usage: Usage::default(),
    }
}

/// A single tool call with no accompanying text
pub fn tool_call_response(id: &str, name: &str, input: Value) -> LlmResponse {
    LlmResponse {
        content: vec![ContentBlock::tool_use(id, name, input)],
        end_turn: false,
        usage: Usage::default(),
    }
}

/// A reply with neither text nor a tool call
pub fn empty_response() -> LlmResponse {
    LlmResponse {
        content: vec![],
        end_turn: true,
        usage: Usage::default(),
    }
}

// ============================================================================
// Mock Search Backend
// ============================================================================

/// Search backend with a canned answer, or one that always fails
pub struct MockSearchBackend {
    answer: Option<String>,
    queries: Mutex<Vec<String>>,
}

impl MockSearchBackend {
    pub fn answering(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for MockSearchBackend {
    async fn search(&self, query: &str) -> Result<String, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.answer
            .clone()
            .ok_or_else(|| SearchError::Unavailable("mock search is down".to_string()))
    }
}

// ============================================================================
// Engines for HTTP layer tests
// ============================================================================

/// Engine whose model call always fails
pub struct FailingEngine;

#[async_trait]
impl ReasoningEngine for FailingEngine {
    async fn run(&self, _ctx: AgentContext) -> Result<Answer, AgentError> {
        Err(AgentError::ExternalService(LlmError::server_error(
            "Gemini API error (503): model overloaded",
        )))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Engine that panics mid-request
pub struct PanickingEngine;

#[async_trait]
impl ReasoningEngine for PanickingEngine {
    async fn run(&self, _ctx: AgentContext) -> Result<Answer, AgentError> {
        panic!("engine exploded")
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

/// Engine that echoes the message and reports how much history it saw
pub struct EchoEngine;

#[async_trait]
impl ReasoningEngine for EchoEngine {
    async fn run(&self, ctx: AgentContext) -> Result<Answer, AgentError> {
        Ok(Answer {
            text: format!("echo: {} (history {})", ctx.user_message, ctx.history.len()),
            steps: vec![],
            iterations: 1,
            hit_iteration_cap: false,
        })
    }

    fn name(&self) -> &str {
        "echo"
    }
}
