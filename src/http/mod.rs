//! HTTP API for the call frontend.
//!
//! This module provides the control and read surface for the assistant:
//! - POST /start-assistant - Launch the assistant for a call
//! - GET /transcript/:call_id - Accumulated transcript
//! - GET /status/:call_id - Session status
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
