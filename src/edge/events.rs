//! Typed call events and their JSON wire form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A call participant as reported by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

/// Events delivered to a session by the transport and transcription
/// collaborators.
///
/// Delivery order within one call is preserved end to end; nothing is assumed
/// about ordering across calls or across event kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallEvent {
    /// The call session is live; the assistant is in the call.
    SessionStarted,
    /// The call session finished.
    SessionEnded,
    ParticipantJoined {
        participant: Participant,
    },
    ParticipantLeft {
        participant: Participant,
    },
    /// A finished speech-to-text result for one utterance.
    TranscriptionReceived {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speaker_id: Option<String>,
    },
    /// A chunk of the answering engine's streamed reply.
    ResponseChunk {
        delta: String,
    },
    /// A collaborator reported a non-fatal failure.
    PluginError {
        message: String,
    },
}

/// JSON envelope carrying one event on the call's event subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub call_id: String,
    /// Set by the publisher; informational only, ordering comes from
    /// delivery order.
    pub timestamp: DateTime<Utc>,
    pub event: CallEvent,
}

impl EventEnvelope {
    pub fn new(call_id: impl Into<String>, event: CallEvent) -> Self {
        Self {
            call_id: call_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Prompt submission published to the answering engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    pub call_id: String,
    pub prompt: String,
    pub timestamp: DateTime<Utc>,
}

/// Join/leave announcements published on a call's control subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ControlMessage {
    Join { agent_id: String },
    Leave { agent_id: String },
}
