//! Trigger-gated question answering.
//!
//! When a transcription trips the trigger phrase, the session hands the
//! question and a transcript snapshot to the query pipeline. The pipeline
//! formats a single bounded prompt and submits it through the edge without
//! blocking the session's event loop; any answer comes back later as a
//! `ResponseChunk` event. Submissions are never retried and are not
//! correlated back to their question.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::edge::{CallEvent, EdgeTransport};
use crate::transcript::TranscriptEntry;

/// Standing instructions the assistant carries into every call.
pub const AGENT_INSTRUCTIONS: &str = "\
You are a meeting transcription bot.

CRITICAL RULES:
1. NEVER speak unless someone says \"Hey Assistant\"
2. NEVER respond to normal conversation
3. ONLY answer questions starting with \"Hey Assistant\"

Your job:
- Transcribe everything
- Stay silent
- Answer ONLY when triggered";

/// Format the bounded prompt for one triggered question.
///
/// Transcript entries appear in order as `[speaker] text` lines, followed by
/// the literal question and an instruction pinning the answer to the
/// transcript.
pub fn build_prompt(question: &str, transcript: &[TranscriptEntry]) -> String {
    let context = transcript
        .iter()
        .map(|entry| format!("[{}] {}", entry.speaker, entry.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "MEETING TRANSCRIPT:\n{}\n\nQUESTION:\n{}\n\nAnswer ONLY using the transcript.\nBe short and factual.",
        context, question
    )
}

/// Submits trigger-gated questions to the answering engine for one call.
pub struct QueryPipeline {
    call_id: String,
    edge: Arc<dyn EdgeTransport>,
    /// Weak so a retained (ended) session does not hold its own event
    /// channel open.
    events: mpsc::WeakSender<CallEvent>,
}

impl QueryPipeline {
    pub fn new(
        call_id: impl Into<String>,
        edge: Arc<dyn EdgeTransport>,
        events: mpsc::WeakSender<CallEvent>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            edge,
            events,
        }
    }

    /// Dispatch one question without blocking the caller.
    ///
    /// The caller takes the transcript snapshot before dispatch, so the
    /// prompt covers everything said up to and including the triggering
    /// utterance. A submission failure is fed back into the session's event
    /// channel as a `PluginError` so it surfaces through the normal
    /// collaborator-error path; if the channel is already closed it is
    /// logged directly.
    pub fn dispatch(&self, question: String, transcript: Vec<TranscriptEntry>) {
        let call_id = self.call_id.clone();
        let edge = Arc::clone(&self.edge);
        let events = self.events.clone();

        tokio::spawn(async move {
            let prompt = build_prompt(&question, &transcript);
            info!(
                "Submitting question for call {} over {} transcript entries",
                call_id,
                transcript.len()
            );

            if let Err(e) = edge.submit_prompt(&call_id, &prompt).await {
                let delivered = match events.upgrade() {
                    Some(events) => {
                        let message = format!("prompt submission failed: {:#}", e);
                        events.send(CallEvent::PluginError { message }).await.is_ok()
                    }
                    None => false,
                };
                if !delivered {
                    error!("Prompt submission failed for call {}: {:#}", call_id, e);
                }
            }
        });
    }
}
