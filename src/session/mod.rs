//! Call session lifecycle.
//!
//! One `CallSession` per joined call: it consumes the call's typed event
//! stream, accumulates the transcript, and gates assistant responses behind
//! the trigger phrase. `SessionRegistry` maps call ids to sessions;
//! `SessionSupervisor` launches each join-and-run lifecycle as a background
//! task and cleans up the registry when a lifecycle fails.

mod registry;
mod session;
mod supervisor;

pub use registry::{RegistryError, SessionRegistry};
pub use session::CallSession;
pub use supervisor::{SessionSupervisor, StartError, SupervisedTask};
