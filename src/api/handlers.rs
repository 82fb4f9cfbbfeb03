//! HTTP request handlers

use super::types::{
    ChatRequest, ChatResponse, ErrorResponse, HealthResponse, ResetQuery, ResetResponse,
};
use super::AppState;
use crate::agent::AgentContext;
use crate::memory::{ConversationTurn, DEFAULT_SESSION};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;

const NO_MESSAGE: &str = "No message provided";
const PROCESSING_FAILED: &str = "An error occurred while processing your request";

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/reset", post(reset))
        .route("/version", get(get_version))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

// ============================================================
// Liveness
// ============================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: now(),
    })
}

async fn get_version() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Chat
// ============================================================

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected chat body");
        AppError::Validation(NO_MESSAGE.to_string())
    })?;

    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation(NO_MESSAGE.to_string()));
    }

    let session_id = req
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_SESSION);

    // Held until both turns are appended
    let handle = state.sessions.session(session_id).await;
    let mut memory = handle.lock().await;

    let ctx = AgentContext {
        system_instructions: state.system_prompt.to_string(),
        history: memory.snapshot(),
        user_message: message.to_string(),
    };

    let answer = state.engine.run(ctx).await.map_err(|e| {
        tracing::error!(session_id, engine = state.engine.name(), error = %e, "Chat failed");
        AppError::Internal {
            details: e.to_string(),
        }
    })?;

    memory.append(ConversationTurn::user(message));
    memory.append(ConversationTurn::agent(answer.text.clone()));
    let turns = memory.len();
    drop(memory);

    tracing::info!(
        session_id,
        engine = state.engine.name(),
        iterations = answer.iterations,
        tool_calls = answer.steps.len(),
        hit_iteration_cap = answer.hit_iteration_cap,
        turns,
        "Chat exchange completed"
    );

    Ok(Json(ChatResponse {
        response: answer.text,
        timestamp: now(),
        status: "success",
        session_id: req.session_id,
    }))
}

// ============================================================
// Reset
// ============================================================

async fn reset(
    State(state): State<AppState>,
    query: Option<Query<ResetQuery>>,
) -> Json<ResetResponse> {
    // A malformed query string resets the default session
    let Query(query) = query.unwrap_or_default();
    let session_id = query
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_SESSION);
    let cleared_turns = state.sessions.turn_count(session_id).await;
    state.sessions.reset(session_id).await;
    tracing::info!(session_id, cleared_turns, "Conversation reset");
    Json(ResetResponse {
        message: "Conversation reset successfully",
    })
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    Validation(String),
    Internal { details: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            AppError::Internal { details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_details(PROCESSING_FAILED, details),
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Answer a panicking handler with the generic 500 body
#[allow(clippy::needless_pass_by_value)] // Signature fixed by CatchPanicLayer
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(details = %details, "Handler panicked");
    AppError::Internal { details }.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::{EchoEngine, FailingEngine, PanickingEngine};
    use crate::agent::{ReasoningEngine, RuleEngine};
    use crate::memory::Role;
    use crate::tools::ToolRegistry;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state(engine: Arc<dyn ReasoningEngine>) -> AppState {
        AppState::new(engine, "test prompt")
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let router = create_router(state(Arc::new(EchoEngine)));
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_chat_success_grows_memory_by_two() {
        let state = state(Arc::new(EchoEngine));
        let router = create_router(state.clone());

        let (status, body) = send(router.clone(), post_json("/chat", r#"{"message":"  hi  "}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "echo: hi (history 0)");
        assert_eq!(body["status"], "success");
        assert!(body["timestamp"].is_string());
        assert!(body.get("session_id").is_none());
        assert_eq!(state.sessions.turn_count(DEFAULT_SESSION).await, 2);

        let (_, body) = send(router, post_json("/chat", r#"{"message":"again"}"#)).await;
        assert_eq!(body["response"], "echo: again (history 2)");
        assert_eq!(state.sessions.turn_count(DEFAULT_SESSION).await, 4);
    }

    #[tokio::test]
    async fn test_chat_rejects_missing_or_blank_message() {
        let state = state(Arc::new(EchoEngine));
        let router = create_router(state.clone());

        for body in [r#"{"message":""}"#, r#"{"message":"   "}"#, "{}", "not json"] {
            let (status, response) = send(router.clone(), post_json("/chat", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
            assert_eq!(response, json!({"error": "No message provided"}));
        }

        let request = Request::post("/chat")
            .body(Body::from(r#"{"message":"hi"}"#))
            .unwrap();
        let (status, _) = send(router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(state.sessions.turn_count(DEFAULT_SESSION).await, 0);
    }

    #[tokio::test]
    async fn test_engine_failure_is_500_and_memory_untouched() {
        let state = state(Arc::new(FailingEngine));
        let router = create_router(state.clone());

        let (status, body) = send(router, post_json("/chat", r#"{"message":"hi"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], PROCESSING_FAILED);
        assert!(body["details"].as_str().unwrap().contains("model overloaded"));
        assert_eq!(state.sessions.turn_count(DEFAULT_SESSION).await, 0);
    }

    #[tokio::test]
    async fn test_panic_is_caught() {
        let state = state(Arc::new(PanickingEngine));
        let router = create_router(state.clone());

        let (status, body) = send(router.clone(), post_json("/chat", r#"{"message":"hi"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], PROCESSING_FAILED);
        assert_eq!(body["details"], "engine exploded");

        // Still serving, and the session lock was released
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, _) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.sessions.turn_count(DEFAULT_SESSION).await, 0);
    }

    #[tokio::test]
    async fn test_reset_clears_history() {
        let state = state(Arc::new(EchoEngine));
        let router = create_router(state.clone());

        send(router.clone(), post_json("/chat", r#"{"message":"one"}"#)).await;
        let (status, body) = send(router.clone(), post_json("/reset", "")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Conversation reset successfully"}));
        assert_eq!(state.sessions.turn_count(DEFAULT_SESSION).await, 0);

        // Reset on empty memory is fine too
        let (status, _) = send(router.clone(), post_json("/reset", "")).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(router, post_json("/chat", r#"{"message":"two"}"#)).await;
        assert_eq!(body["response"], "echo: two (history 0)");
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let state = state(Arc::new(EchoEngine));
        let router = create_router(state.clone());

        let (_, body) = send(
            router.clone(),
            post_json("/chat", r#"{"message":"hi","session_id":"alice"}"#),
        )
        .await;
        assert_eq!(body["session_id"], "alice");
        send(router.clone(), post_json("/chat", r#"{"message":"hi"}"#)).await;

        send(router, post_json("/reset?session_id=alice", "")).await;
        assert_eq!(state.sessions.turn_count("alice").await, 0);
        assert_eq!(state.sessions.turn_count(DEFAULT_SESSION).await, 2);
    }

    #[tokio::test]
    async fn test_reset_with_malformed_query_resets_default_session() {
        let state = state(Arc::new(EchoEngine));
        let router = create_router(state.clone());

        send(router.clone(), post_json("/chat", r#"{"message":"hi"}"#)).await;
        let (status, body) = send(
            router,
            post_json("/reset?session_id=a&session_id=b", ""),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Conversation reset successfully"}));
        assert_eq!(state.sessions.turn_count(DEFAULT_SESSION).await, 0);
    }

    #[tokio::test]
    async fn test_reset_releases_session_entries() {
        let state = state(Arc::new(EchoEngine));
        let router = create_router(state.clone());

        for i in 0..20 {
            let body = format!(r#"{{"message":"hi","session_id":"user-{i}"}}"#);
            send(router.clone(), post_json("/chat", &body)).await;
            send(router.clone(), post_json(&format!("/reset?session_id=user-{i}"), "")).await;
        }
        assert_eq!(state.sessions.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_chats_keep_pairs_together() {
        let state = state(Arc::new(EchoEngine));
        let router = create_router(state.clone());

        let (a, b) = tokio::join!(
            send(router.clone(), post_json("/chat", r#"{"message":"a"}"#)),
            send(router.clone(), post_json("/chat", r#"{"message":"b"}"#)),
        );
        assert_eq!(a.0, StatusCode::OK);
        assert_eq!(b.0, StatusCode::OK);

        let handle = state.sessions.session(DEFAULT_SESSION).await;
        let turns = handle.lock().await.snapshot();
        let roles: Vec<_> = turns.iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Agent, Role::User, Role::Agent]);
        assert_eq!(turns[1].text, format!("echo: {} (history 0)", turns[0].text));
        assert_eq!(turns[3].text, format!("echo: {} (history 2)", turns[2].text));
    }

    #[tokio::test]
    async fn test_rule_engine_end_to_end() {
        let tools = Arc::new(ToolRegistry::standard(Arc::new(
            crate::agent::testing::MockSearchBackend::answering("unused"),
        )));
        let router = create_router(state(Arc::new(RuleEngine::new(tools))));

        let (status, body) = send(
            router,
            post_json("/chat", r#"{"message":"What is my BMI? I'm 90 kg and 175 cm"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["response"]
            .as_str()
            .unwrap()
            .starts_with("BMI: 29.4 (Overweight)"));
    }

    #[tokio::test]
    async fn test_version() {
        let router = create_router(state(Arc::new(EchoEngine)));
        let response = router
            .oneshot(Request::get("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).starts_with("wellbeing_agent "));
    }
}
