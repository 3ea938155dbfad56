//! NATS-backed edge transport.
//!
//! Subjects follow the `call.<kind>.<call_id>` convention: the transport
//! publishes call events on `call.events.<call_id>`, we announce joins and
//! leaves on `call.control.<call_id>`, and prompts for the answering engine
//! go out on `call.prompt.<call_id>`.

use anyhow::{Context, Result};
use async_nats::Client;
use async_trait::async_trait;
use futures::stream::StreamExt;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::events::{ControlMessage, EventEnvelope, PromptMessage};
use super::{AgentIdentity, CallEvent, CallJoinHandle, EdgeTransport};

/// Subject on which assistant identities are announced.
const IDENTITY_SUBJECT: &str = "call.agent.identity";

fn events_subject(call_id: &str) -> String {
    format!("call.events.{}", call_id)
}

fn control_subject(call_id: &str) -> String {
    format!("call.control.{}", call_id)
}

fn prompt_subject(call_id: &str) -> String {
    format!("call.prompt.{}", call_id)
}

/// Edge transport backed by a NATS connection.
pub struct NatsEdge {
    client: Client,
    identity: AgentIdentity,
}

impl NatsEdge {
    /// Connect to the NATS server backing the call transport.
    pub async fn connect(url: &str, identity: AgentIdentity) -> Result<Self> {
        info!("Connecting to edge transport at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Edge transport connected");

        Ok(Self { client, identity })
    }
}

#[async_trait]
impl EdgeTransport for NatsEdge {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    async fn create_identity(&self) -> Result<()> {
        let payload = serde_json::to_vec(&self.identity)?;

        self.client
            .publish(IDENTITY_SUBJECT, payload.into())
            .await
            .context("Failed to announce agent identity")?;

        info!("Announced agent identity {}", self.identity.id);

        Ok(())
    }

    async fn join_call(
        &self,
        call_id: &str,
        events: mpsc::Sender<CallEvent>,
    ) -> Result<CallJoinHandle> {
        let subject = events_subject(call_id);
        info!("Joining call {} (events on {})", call_id, subject);

        let mut subscriber = self
            .client
            .subscribe(subject)
            .await
            .context("Failed to subscribe to call events")?;

        let announce = ControlMessage::Join {
            agent_id: self.identity.id.clone(),
        };
        self.client
            .publish(control_subject(call_id), serde_json::to_vec(&announce)?.into())
            .await
            .context("Failed to announce call join")?;

        let expected = call_id.to_string();
        let pump = tokio::spawn(async move {
            while let Some(msg) = subscriber.next().await {
                let envelope = match serde_json::from_slice::<EventEnvelope>(&msg.payload) {
                    Ok(envelope) => envelope,
                    Err(e) => {
                        warn!("Failed to parse call event: {}", e);
                        continue;
                    }
                };

                if envelope.call_id != expected {
                    continue;
                }

                if events.send(envelope.event).await.is_err() {
                    // Session loop is gone; stop pumping.
                    break;
                }
            }

            info!("Event stream ended for call {}", expected);
        });

        Ok(CallJoinHandle::new(call_id, Some(pump)))
    }

    async fn submit_prompt(&self, call_id: &str, prompt: &str) -> Result<()> {
        let message = PromptMessage {
            call_id: call_id.to_string(),
            prompt: prompt.to_string(),
            timestamp: chrono::Utc::now(),
        };
        let payload = serde_json::to_vec(&message)?;
        let bytes = payload.len();

        self.client
            .publish(prompt_subject(call_id), payload.into())
            .await
            .context("Failed to submit prompt")?;

        info!("Submitted prompt for call {} ({} bytes)", call_id, bytes);

        Ok(())
    }

    async fn leave_call(&self, call_id: &str) -> Result<()> {
        let announce = ControlMessage::Leave {
            agent_id: self.identity.id.clone(),
        };
        self.client
            .publish(control_subject(call_id), serde_json::to_vec(&announce)?.into())
            .await
            .context("Failed to announce call leave")?;

        info!("Left call {}", call_id);

        Ok(())
    }
}
