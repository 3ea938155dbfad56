use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use super::session::CallSession;

/// Why a session could not be registered.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("assistant already running for call {0}")]
    AlreadyRegistered(String),
}

/// Process-wide map of live and finished call sessions.
///
/// Owned by `main` and shared via `Arc` with the HTTP state and the
/// supervisor; nothing reaches it as ambient global state. The duplicate
/// check in `register` happens under the write lock, so two concurrent start
/// requests for the same call cannot both succeed.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<CallSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new session, rejecting a duplicate `call_id`.
    pub async fn register(&self, session: Arc<CallSession>) -> Result<(), RegistryError> {
        let mut sessions = self.sessions.write().await;
        let call_id = session.call_id().to_string();
        if sessions.contains_key(&call_id) {
            return Err(RegistryError::AlreadyRegistered(call_id));
        }
        sessions.insert(call_id, session);
        Ok(())
    }

    pub async fn lookup(&self, call_id: &str) -> Option<Arc<CallSession>> {
        let sessions = self.sessions.read().await;
        sessions.get(call_id).cloned()
    }

    /// Drop a session. Used when the supervised lifecycle fails; sessions
    /// that end normally stay registered for historical queries.
    pub async fn remove(&self, call_id: &str) -> Option<Arc<CallSession>> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(call_id)
    }

    /// Number of registered sessions, live and ended.
    pub async fn len(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
