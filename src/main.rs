//! Wellbeing Agent - health and mental wellbeing chat API
//!
//! Forwards user questions to a tool-calling LLM agent with BMI, calorie,
//! stress and activity calculators plus web search, keeping per-session
//! conversation memory in process.

mod agent;
mod api;
mod health;
mod llm;
mod memory;
mod system_prompt;
mod tools;

use agent::{EngineConfig, ReasoningEngine, RuleEngine, ToolCallingEngine};
use api::{create_router, AppState};
use llm::{LlmConfig, ModelRegistry};
use memory::SessionStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tools::{DuckDuckGoSearch, ToolRegistry};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wellbeing_agent=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let port: u16 = std::env::var("WELLBEING_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    // Tools
    let search = Arc::new(DuckDuckGoSearch::from_env()?);
    let tools = Arc::new(ToolRegistry::standard(search));
    let system_prompt = system_prompt::build_system_prompt(&tools);

    // Initialize LLM registry
    let llm_config = LlmConfig::from_env();
    let llm_registry = ModelRegistry::new(&llm_config);

    let engine: Arc<dyn ReasoningEngine> = match llm_registry.default() {
        Some(llm) => {
            let config = EngineConfig::from_env();
            tracing::info!(
                models = ?llm_registry.available_models(),
                default = %llm_registry.default_model_id(),
                max_iterations = config.max_iterations,
                "LLM registry initialized"
            );
            Arc::new(ToolCallingEngine::new(llm, Arc::clone(&tools), config))
        }
        None => {
            tracing::warn!(
                "No LLM credentials configured. Set GEMINI_API_KEY or LLM_GATEWAY; answering with keyword rules."
            );
            Arc::new(RuleEngine::new(Arc::clone(&tools)))
        }
    };

    let state = AppState::new(engine, system_prompt).with_sessions(SessionStore::from_env());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(tools = tools.len(), "Wellbeing agent listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
