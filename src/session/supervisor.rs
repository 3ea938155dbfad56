use std::sync::Arc;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::registry::{RegistryError, SessionRegistry};
use super::session::CallSession;
use crate::assist::QueryPipeline;
use crate::edge::{CallEvent, EdgeTransport};

/// Buffered events per session. Delivery order is preserved; the buffer only
/// absorbs bursts while the consumer loop is busy.
const EVENT_BUFFER: usize = 100;

/// Why a start request was not accepted.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("call_id is required")]
    MissingCallId,
    #[error("assistant already running for call {0}")]
    AlreadyRunning(String),
}

/// A launched join-and-run lifecycle.
///
/// The task runs detached from the request that started it; the handle makes
/// its completion observable for tests and shutdown paths.
pub struct SupervisedTask {
    pub id: Uuid,
    pub call_id: String,
    handle: JoinHandle<()>,
}

impl SupervisedTask {
    /// Wait for the lifecycle to finish.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            error!("Session task for call {} panicked: {}", self.call_id, e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Launches and tracks per-call session lifecycles.
///
/// A start request registers the session synchronously, then spawns the
/// join-and-run lifecycle in the background and returns. Any lifecycle
/// failure, before or during the call, logs the error and removes the
/// session from the registry; a lifecycle that completes normally leaves the
/// session registered with its transcript intact.
pub struct SessionSupervisor {
    registry: Arc<SessionRegistry>,
    edge: Arc<dyn EdgeTransport>,
    tasks: Mutex<Vec<SupervisedTask>>,
}

impl SessionSupervisor {
    pub fn new(registry: Arc<SessionRegistry>, edge: Arc<dyn EdgeTransport>) -> Self {
        Self {
            registry,
            edge,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Accept a start request for `call_id`.
    ///
    /// Returns the supervised task's id as soon as the lifecycle is spawned:
    /// acceptance only, not join completion.
    pub async fn start(&self, call_id: &str) -> Result<Uuid, StartError> {
        let call_id = call_id.trim();
        if call_id.is_empty() {
            return Err(StartError::MissingCallId);
        }

        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let pipeline = QueryPipeline::new(call_id, Arc::clone(&self.edge), events_tx.downgrade());
        let session = Arc::new(CallSession::new(
            call_id,
            self.edge.identity().id.clone(),
            pipeline,
        ));

        if let Err(RegistryError::AlreadyRegistered(id)) =
            self.registry.register(Arc::clone(&session)).await
        {
            return Err(StartError::AlreadyRunning(id));
        }

        let task_id = Uuid::new_v4();
        let registry = Arc::clone(&self.registry);
        let edge = Arc::clone(&self.edge);
        let call = call_id.to_string();

        let handle = tokio::spawn(async move {
            if let Err(e) = run_lifecycle(edge, session, events_tx, events_rx).await {
                error!("Session lifecycle failed for call {}: {:#}", call, e);
                registry.remove(&call).await;
            }
        });

        info!("Launched session task {} for call {}", task_id, call_id);

        let mut tasks = self.tasks.lock().await;
        tasks.retain(|task| !task.is_finished());
        tasks.push(SupervisedTask {
            id: task_id,
            call_id: call_id.to_string(),
            handle,
        });

        Ok(task_id)
    }

    /// Wait for every launched lifecycle to finish.
    pub async fn join_all(&self) {
        let tasks: Vec<SupervisedTask> = {
            let mut guard = self.tasks.lock().await;
            guard.drain(..).collect()
        };
        for task in tasks {
            task.join().await;
        }
    }
}

/// Join the call and drain its events until the call ends.
async fn run_lifecycle(
    edge: Arc<dyn EdgeTransport>,
    session: Arc<CallSession>,
    events: mpsc::Sender<CallEvent>,
    inbox: mpsc::Receiver<CallEvent>,
) -> Result<()> {
    let call_id = session.call_id().to_string();

    edge.create_identity()
        .await
        .context("Failed to create agent identity")?;

    let handle = edge
        .join_call(&call_id, events)
        .await
        .context("Failed to join call")?;

    info!("Assistant active for call {}", call_id);

    session.run(inbox).await;

    info!("Releasing event stream for call {}", handle.call_id());
    handle.release();
    if let Err(e) = edge.leave_call(&call_id).await {
        warn!("Failed to announce departure from call {}: {:#}", call_id, e);
    }

    info!("Session finished for call {}", call_id);

    Ok(())
}
