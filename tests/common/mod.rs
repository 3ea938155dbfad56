//! Shared test doubles and polling helpers.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, Instant};

use meeting_assistant::assist::{QueryPipeline, AGENT_INSTRUCTIONS};
use meeting_assistant::edge::{AgentIdentity, CallEvent, CallJoinHandle, EdgeTransport};
use meeting_assistant::session::{CallSession, SessionRegistry};
use meeting_assistant::transcript::TranscriptEntry;

pub const BOT_ID: &str = "meeting-assistant-bot";

const WAIT: Duration = Duration::from_secs(2);
const TICK: Duration = Duration::from_millis(10);

/// In-memory edge transport: records submitted prompts and captures the
/// event sender of every joined call so tests can drive sessions.
pub struct FakeEdge {
    identity: AgentIdentity,
    submitted: Mutex<Vec<(String, String)>>,
    senders: Mutex<Vec<(String, mpsc::Sender<CallEvent>)>>,
    fail_join: bool,
    fail_submit: bool,
}

impl FakeEdge {
    pub fn new() -> Arc<Self> {
        Self::build(false, false)
    }

    /// Every join attempt fails, as if the transport rejected the call.
    pub fn failing_join() -> Arc<Self> {
        Self::build(true, false)
    }

    /// Prompt submissions fail, as if the answering engine were down.
    pub fn failing_submit() -> Arc<Self> {
        Self::build(false, true)
    }

    fn build(fail_join: bool, fail_submit: bool) -> Arc<Self> {
        Arc::new(Self {
            identity: AgentIdentity {
                id: BOT_ID.to_string(),
                name: "Meeting Assistant".to_string(),
                instructions: AGENT_INSTRUCTIONS.to_string(),
            },
            submitted: Mutex::new(Vec::new()),
            senders: Mutex::new(Vec::new()),
            fail_join,
            fail_submit,
        })
    }

    pub async fn submitted_prompts(&self) -> Vec<(String, String)> {
        self.submitted.lock().await.clone()
    }

    pub async fn joined_calls(&self) -> Vec<String> {
        let senders = self.senders.lock().await;
        senders.iter().map(|(call_id, _)| call_id.clone()).collect()
    }

    /// Drop every captured sender, simulating a dead transport.
    pub async fn drop_senders(&self) {
        self.senders.lock().await.clear();
    }
}

#[async_trait]
impl EdgeTransport for FakeEdge {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    async fn create_identity(&self) -> Result<()> {
        Ok(())
    }

    async fn join_call(
        &self,
        call_id: &str,
        events: mpsc::Sender<CallEvent>,
    ) -> Result<CallJoinHandle> {
        if self.fail_join {
            bail!("transport rejected join for {}", call_id);
        }
        self.senders
            .lock()
            .await
            .push((call_id.to_string(), events));
        Ok(CallJoinHandle::new(call_id, None))
    }

    async fn submit_prompt(&self, call_id: &str, prompt: &str) -> Result<()> {
        if self.fail_submit {
            bail!("answering engine unavailable");
        }
        self.submitted
            .lock()
            .await
            .push((call_id.to_string(), prompt.to_string()));
        Ok(())
    }

    async fn leave_call(&self, _call_id: &str) -> Result<()> {
        Ok(())
    }
}

/// A session wired to the fake edge, plus both ends of its event channel.
pub fn session_with_channel(
    call_id: &str,
    edge: Arc<FakeEdge>,
) -> (
    Arc<CallSession>,
    mpsc::Sender<CallEvent>,
    mpsc::Receiver<CallEvent>,
) {
    let (tx, rx) = mpsc::channel(100);
    let pipeline = QueryPipeline::new(call_id, edge, tx.downgrade());
    let session = Arc::new(CallSession::new(call_id, BOT_ID, pipeline));
    (session, tx, rx)
}

/// Poll until the edge has at least `count` submitted prompts.
pub async fn wait_for_prompts(edge: &FakeEdge, count: usize) -> Vec<(String, String)> {
    let deadline = Instant::now() + WAIT;
    loop {
        let prompts = edge.submitted_prompts().await;
        if prompts.len() >= count {
            return prompts;
        }
        assert!(
            Instant::now() < deadline,
            "timed out waiting for {} submitted prompts",
            count
        );
        sleep(TICK).await;
    }
}

/// Poll until `call_id` has been joined, returning its event sender.
pub async fn wait_for_join(edge: &FakeEdge, call_id: &str) -> mpsc::Sender<CallEvent> {
    let deadline = Instant::now() + WAIT;
    loop {
        {
            let senders = edge.senders.lock().await;
            if let Some((_, tx)) = senders.iter().find(|(joined, _)| joined == call_id) {
                return tx.clone();
            }
        }
        assert!(
            Instant::now() < deadline,
            "timed out waiting to join {}",
            call_id
        );
        sleep(TICK).await;
    }
}

/// Poll until the session under `call_id` reports the wanted active state.
pub async fn wait_for_active(registry: &SessionRegistry, call_id: &str, want: bool) {
    let deadline = Instant::now() + WAIT;
    loop {
        if let Some(session) = registry.lookup(call_id).await {
            if session.is_active() == want {
                return;
            }
        }
        assert!(
            Instant::now() < deadline,
            "timed out waiting for {} active={}",
            call_id,
            want
        );
        sleep(TICK).await;
    }
}

/// Poll until the session has accumulated `len` transcript entries.
pub async fn wait_for_transcript_len(session: &CallSession, len: usize) -> Vec<TranscriptEntry> {
    let deadline = Instant::now() + WAIT;
    loop {
        let transcript = session.transcript().await;
        if transcript.len() >= len {
            return transcript;
        }
        assert!(
            Instant::now() < deadline,
            "timed out waiting for {} transcript entries",
            len
        );
        sleep(TICK).await;
    }
}

/// Poll until `call_id` is no longer registered.
pub async fn wait_for_removal(registry: &SessionRegistry, call_id: &str) {
    let deadline = Instant::now() + WAIT;
    loop {
        if registry.lookup(call_id).await.is_none() {
            return;
        }
        assert!(
            Instant::now() < deadline,
            "timed out waiting for {} to be removed",
            call_id
        );
        sleep(TICK).await;
    }
}
