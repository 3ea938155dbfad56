use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::state::AppState;
use crate::session::StartError;
use crate::transcript::TranscriptEntry;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartAssistantRequest {
    /// Call to join. Rejected when missing or empty.
    #[serde(default)]
    pub call_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartAssistantResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub transcript: Vec<TranscriptEntry>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /start-assistant
/// Launch the meeting assistant for a call. Responds as soon as the
/// supervised join is spawned; success means the request was accepted, not
/// that the call was joined.
pub async fn start_assistant(
    State(state): State<AppState>,
    Json(req): Json<StartAssistantRequest>,
) -> impl IntoResponse {
    // Trim once so the registry key and the echoed message agree.
    let call_id = req.call_id.unwrap_or_default();
    let call_id = call_id.trim();

    match state.supervisor.start(call_id).await {
        Ok(task_id) => {
            info!("Accepted start request for call {} (task {})", call_id, task_id);
            (
                StatusCode::OK,
                Json(StartAssistantResponse {
                    status: "success".to_string(),
                    message: format!("Meeting assistant started for call {}", call_id),
                }),
            )
                .into_response()
        }
        Err(StartError::MissingCallId) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "call_id is required".to_string(),
            }),
        )
            .into_response(),
        Err(e @ StartError::AlreadyRunning(_)) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /transcript/:call_id
/// Accumulated transcript for a call. An unknown call yields an empty
/// transcript, not an error.
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> impl IntoResponse {
    let transcript = match state.registry.lookup(&call_id).await {
        Some(session) => session.transcript().await,
        None => Vec::new(),
    };

    (StatusCode::OK, Json(TranscriptResponse { transcript }))
}

/// GET /status/:call_id
/// Session status derived from registry presence and the active flag.
pub async fn get_status(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> impl IntoResponse {
    let response = match state.registry.lookup(&call_id).await {
        Some(session) => {
            let is_active = session.is_active();
            StatusResponse {
                call_id: Some(call_id),
                is_active: Some(is_active),
                status: if is_active { "active" } else { "inactive" }.to_string(),
            }
        }
        None => StatusResponse {
            call_id: None,
            is_active: None,
            status: "not_found".to_string(),
        },
    };

    (StatusCode::OK, Json(response))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
