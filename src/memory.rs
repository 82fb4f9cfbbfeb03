//! Conversation memory
//!
//! An ordered, append-only log of turns per session. Memory lives only in
//! process; a restart starts every session empty.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Live sessions kept before the least recently active idle one is evicted
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Session used when a request does not name one
pub const DEFAULT_SESSION: &str = "default";

/// Who spoke a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Agent,
}

/// One utterance in a conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Chronological turn log for a single session
#[derive(Debug, Default)]
pub struct ConversationMemory {
    turns: Vec<ConversationTurn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// Copy of the log in insertion order
    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.turns.clone()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Time of the newest turn, `None` while empty
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.turns.last().map(|turn| turn.timestamp)
    }
}

/// Handle to one session's memory.
///
/// The mutex is held for a whole chat exchange, so exchanges within a
/// session are serialized and each user/agent pair lands contiguously.
pub type SessionHandle = Arc<Mutex<ConversationMemory>>;

/// All live sessions, keyed by session id.
///
/// Session ids come from clients, so the map is bounded: creating a session
/// past `max_sessions` evicts the idle session with the oldest activity.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_SESSIONS)
    }

    pub fn with_limit(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Limit from `WELLBEING_MAX_SESSIONS`, defaulting to [`DEFAULT_MAX_SESSIONS`]
    pub fn from_env() -> Self {
        let limit = std::env::var("WELLBEING_MAX_SESSIONS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_SESSIONS);
        Self::with_limit(limit)
    }

    /// Get the memory for a session, creating it empty on first use
    pub async fn session(&self, session_id: &str) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(session_id) {
            return Arc::clone(handle);
        }

        let mut sessions = self.sessions.write().await;
        if let Some(handle) = sessions.get(session_id) {
            return Arc::clone(handle);
        }
        if sessions.len() >= self.max_sessions {
            Self::evict_idle(&mut sessions);
        }

        tracing::debug!(session_id, live = sessions.len() + 1, "Creating conversation session");
        let handle = Arc::new(Mutex::new(ConversationMemory::new()));
        sessions.insert(session_id.to_string(), Arc::clone(&handle));
        handle
    }

    /// Drop the idle session whose last turn is oldest; empty sessions go first.
    /// Sessions with an exchange in flight are skipped.
    fn evict_idle(sessions: &mut HashMap<String, SessionHandle>) {
        let victim = sessions
            .iter()
            .filter_map(|(id, handle)| {
                let memory = handle.try_lock().ok()?;
                Some((memory.last_activity(), id.clone()))
            })
            .min()
            .map(|(_, id)| id);

        match victim {
            Some(id) => {
                sessions.remove(&id);
                tracing::info!(session_id = %id, "Evicted idle conversation session");
            }
            None => {
                tracing::warn!(live = sessions.len(), "Session limit reached with every session busy");
            }
        }
    }

    /// Forget a session. Resetting an unknown or empty session is a no-op.
    ///
    /// An exchange already in flight keeps its handle and finishes against
    /// the detached memory; the next request starts empty.
    pub async fn reset(&self, session_id: &str) {
        let removed = self.sessions.write().await.remove(session_id);
        if let Some(handle) = removed {
            handle.lock().await.clear();
        }
    }

    /// Number of turns currently stored for a session
    pub async fn turn_count(&self, session_id: &str) -> usize {
        let handle = self.sessions.read().await.get(session_id).cloned();
        match handle {
            Some(handle) => handle.lock().await.len(),
            None => 0,
        }
    }

    /// Number of sessions currently held
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
