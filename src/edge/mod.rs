//! Collaborator boundary.
//!
//! Everything outside this process (the transport that joins calls, the
//! speech-to-text engine, the answering engine) is reached through the
//! `EdgeTransport` trait and the typed `CallEvent` values it delivers. The
//! production binding over NATS lives in `client`; tests substitute
//! in-memory fakes.

mod client;
mod events;

pub use client::NatsEdge;
pub use events::{CallEvent, ControlMessage, EventEnvelope, Participant, PromptMessage};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identity the assistant presents inside calls, including the standing
/// instructions handed to the answering engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIdentity {
    pub id: String,
    pub name: String,
    pub instructions: String,
}

/// Outbound operations the core invokes on the transport.
#[async_trait]
pub trait EdgeTransport: Send + Sync {
    /// The identity this transport joins calls as.
    fn identity(&self) -> &AgentIdentity;

    /// Register the assistant's identity with the transport.
    async fn create_identity(&self) -> Result<()>;

    /// Join a call: subscribe to its event stream and pump parsed events
    /// into `events` until the returned handle is released or the stream
    /// ends.
    async fn join_call(
        &self,
        call_id: &str,
        events: mpsc::Sender<CallEvent>,
    ) -> Result<CallJoinHandle>;

    /// Submit one prompt to the answering engine. Fire-and-forget: any
    /// answer arrives later as `CallEvent::ResponseChunk`.
    async fn submit_prompt(&self, call_id: &str, prompt: &str) -> Result<()>;

    /// Announce departure from a call.
    async fn leave_call(&self, call_id: &str) -> Result<()>;
}

/// Scoped handle to a joined call.
///
/// Owns the subscription pump feeding the session's event channel. Releasing
/// the handle, explicitly or by dropping it, stops the pump and with it the
/// subscription, so a session can never leak its event stream.
pub struct CallJoinHandle {
    call_id: String,
    pump: Option<JoinHandle<()>>,
}

impl CallJoinHandle {
    pub fn new(call_id: impl Into<String>, pump: Option<JoinHandle<()>>) -> Self {
        Self {
            call_id: call_id.into(),
            pump,
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    /// Stop the event pump. Dropping the handle has the same effect.
    pub fn release(mut self) {
        self.abort_pump();
    }

    fn abort_pump(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}

impl Drop for CallJoinHandle {
    fn drop(&mut self) {
        self.abort_pump();
    }
}
