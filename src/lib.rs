pub mod assist;
pub mod config;
pub mod edge;
pub mod http;
pub mod session;
pub mod transcript;
pub mod trigger;

pub use assist::{build_prompt, QueryPipeline, AGENT_INSTRUCTIONS};
pub use config::Config;
pub use edge::{AgentIdentity, CallEvent, CallJoinHandle, EdgeTransport, NatsEdge, Participant};
pub use http::{create_router, AppState};
pub use session::{CallSession, SessionRegistry, SessionSupervisor, StartError, SupervisedTask};
pub use transcript::{TranscriptEntry, TranscriptStore};
pub use trigger::{TriggerResult, TRIGGER_PHRASE};
