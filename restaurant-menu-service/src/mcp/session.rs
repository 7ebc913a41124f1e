//! MCP SSE session tracking.
//!
//! Each open `GET /sse` stream owns one session. Responses to requests posted
//! with that session's id are routed back onto its stream.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};

/// Manager for all open SSE sessions
#[derive(Default)]
pub struct SessionManager {
    sessions: DashMap<String, mpsc::UnboundedSender<String>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session, returning its id and the receiving end of its stream
    pub fn open(&self) -> (String, mpsc::UnboundedReceiver<String>) {
        let session_id = uuid::Uuid::new_v4().simple().to_string();
        let (tx, rx) = mpsc::unbounded_channel();
        debug!(session_id = %session_id, "Opening MCP session");
        self.sessions.insert(session_id.clone(), tx);
        (session_id, rx)
    }

    /// Remove a session
    pub fn close(&self, session_id: &str) {
        debug!(session_id = %session_id, "Closing MCP session");
        self.sessions.remove(session_id);
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Queue a serialized JSON-RPC message on a session's stream
    pub fn send(&self, session_id: &str, message: String) -> ServiceResult<()> {
        let not_found = || ServiceError::SessionNotFound {
            session_id: session_id.to_string(),
        };

        let tx = self.sessions.get(session_id).ok_or_else(not_found)?;
        tx.send(message).map_err(|_| not_found())
    }

    /// Number of open sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Closes its session when the owning SSE stream is dropped
pub struct SessionGuard {
    sessions: Arc<SessionManager>,
    session_id: String,
}

impl SessionGuard {
    pub fn new(sessions: Arc<SessionManager>, session_id: String) -> Self {
        Self {
            sessions,
            session_id,
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.close(&self.session_id);
    }
}
