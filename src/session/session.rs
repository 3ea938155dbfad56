use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::assist::QueryPipeline;
use crate::edge::CallEvent;
use crate::transcript::{TranscriptEntry, TranscriptStore};
use crate::trigger::{self, TriggerResult};

/// The state and event-handling unit for one call.
///
/// A session is registered before the call is joined and stays registered
/// after the call ends so its transcript remains queryable. The supervised
/// lifecycle runs [`CallSession::run`] as the single consumer of the
/// session's event channel; the HTTP surface only reads.
pub struct CallSession {
    call_id: String,

    /// True between `SessionStarted` and `SessionEnded`.
    active: AtomicBool,

    /// Everything said in the call, in delivery order.
    transcript: TranscriptStore,

    /// The assistant's own participant id, excluded from join/leave logging.
    assistant_id: String,

    /// Trigger-gated query dispatch for this call.
    pipeline: QueryPipeline,
}

impl CallSession {
    pub fn new(
        call_id: impl Into<String>,
        assistant_id: impl Into<String>,
        pipeline: QueryPipeline,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            active: AtomicBool::new(false),
            transcript: TranscriptStore::new(),
            assistant_id: assistant_id.into(),
            pipeline,
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Snapshot of the accumulated transcript.
    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.snapshot().await
    }

    /// Drain the session's event channel until the call ends.
    ///
    /// Returns after `SessionEnded` has been processed, or when every sender
    /// is gone (transport died). Events are handled strictly in delivery
    /// order; the only work dispatched off this loop is the trigger-gated
    /// prompt submission.
    pub async fn run(&self, mut events: mpsc::Receiver<CallEvent>) {
        while let Some(event) = events.recv().await {
            let ended = matches!(event, CallEvent::SessionEnded);
            self.handle_event(event).await;
            if ended {
                break;
            }
        }

        info!("Event loop finished for call {}", self.call_id);
    }

    /// Apply one event to the session.
    pub async fn handle_event(&self, event: CallEvent) {
        match event {
            CallEvent::SessionStarted => {
                self.active.store(true, Ordering::SeqCst);
                info!("Meeting {} started", self.call_id);
            }
            CallEvent::SessionEnded => {
                self.active.store(false, Ordering::SeqCst);
                info!("Meeting {} ended", self.call_id);
            }
            CallEvent::ParticipantJoined { participant } => {
                if participant.id != self.assistant_id {
                    info!("Joined {}: {}", self.call_id, participant.name);
                }
            }
            CallEvent::ParticipantLeft { participant } => {
                if participant.id != self.assistant_id {
                    info!("Left {}: {}", self.call_id, participant.name);
                }
            }
            CallEvent::TranscriptionReceived { text, speaker_id } => {
                self.on_transcription(&text, speaker_id).await;
            }
            CallEvent::ResponseChunk { delta } => {
                // Observed only; assistant output is never part of the
                // transcript.
                if !delta.is_empty() {
                    info!("Assistant ({}): {}", self.call_id, delta);
                }
            }
            CallEvent::PluginError { message } => {
                error!("Plugin error in call {}: {}", self.call_id, message);
            }
        }
    }

    async fn on_transcription(&self, text: &str, speaker_id: Option<String>) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let speaker = speaker_id.unwrap_or_else(|| "Unknown".to_string());
        self.transcript
            .append(TranscriptEntry::new(speaker.clone(), text))
            .await;
        info!("[{}] {}", speaker, text);

        if let TriggerResult::Triggered(question) = trigger::detect(text) {
            // Snapshot after the append so the triggering utterance is part
            // of the prompt context.
            let snapshot = self.transcript.snapshot().await;
            info!("Trigger phrase in call {}: {}", self.call_id, question);
            self.pipeline.dispatch(question, snapshot);
        }
    }
}
