use std::sync::Arc;

use crate::session::{SessionRegistry, SessionSupervisor};

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// All known call sessions, live and ended.
    pub registry: Arc<SessionRegistry>,
    /// Launches the supervised join lifecycle for new calls.
    pub supervisor: Arc<SessionSupervisor>,
}

impl AppState {
    pub fn new(registry: Arc<SessionRegistry>, supervisor: Arc<SessionSupervisor>) -> Self {
        Self {
            registry,
            supervisor,
        }
    }
}
