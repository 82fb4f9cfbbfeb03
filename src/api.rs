//! HTTP API for the wellbeing agent

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::agent::ReasoningEngine;
use crate::memory::SessionStore;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn ReasoningEngine>,
    pub sessions: Arc<SessionStore>,
    pub system_prompt: Arc<str>,
}

impl AppState {
    pub fn new(engine: Arc<dyn ReasoningEngine>, system_prompt: impl Into<Arc<str>>) -> Self {
        Self {
            engine,
            sessions: Arc::new(SessionStore::new()),
            system_prompt: system_prompt.into(),
        }
    }

    /// Replace the session store, e.g. with one sized from the environment
    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = Arc::new(sessions);
        self
    }
}
