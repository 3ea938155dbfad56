use anyhow::Result;
use serde::Deserialize;

use crate::assist::AGENT_INSTRUCTIONS;
use crate::edge::AgentIdentity;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub edge: EdgeConfig,
    pub assistant: AssistantConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeConfig {
    pub nats_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    pub bot_id: String,
    pub bot_name: String,
}

impl Config {
    /// Load configuration: built-in defaults, overridden by `<path>.toml`
    /// when present, overridden by `MEETING_ASSISTANT__*` environment
    /// variables.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "meeting-assistant")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 8000_i64)?
            .set_default("edge.nats_url", "nats://localhost:4222")?
            .set_default("assistant.bot_id", "meeting-assistant-bot")?
            .set_default("assistant.bot_name", "Meeting Assistant")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("MEETING_ASSISTANT").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl AssistantConfig {
    /// The identity the assistant presents in every call.
    pub fn identity(&self) -> AgentIdentity {
        AgentIdentity {
            id: self.bot_id.clone(),
            name: self.bot_name.clone(),
            instructions: AGENT_INSTRUCTIONS.to_string(),
        }
    }
}
