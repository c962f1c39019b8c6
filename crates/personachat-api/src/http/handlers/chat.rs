//! Session lifecycle and message handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use personachat_types::turn::Turn;

use crate::http::error::AppError;
use crate::http::handlers::parse_uuid;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for POST /sessions/:id/messages.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// Response body for a delivered message.
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub reply: String,
}

/// POST /api/v1/personas/:key/sessions - Start a new session for a persona.
pub async fn start_session(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let session_id = state.orchestrator.start(&key)?;
    let turns = state.orchestrator.history(session_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({"session_id": session_id, "persona_key": key, "turns": turns}),
        request_id,
        elapsed,
    )
    .with_link("messages", &format!("/api/v1/sessions/{session_id}/messages"))
    .with_link("turns", &format!("/api/v1/sessions/{session_id}/turns"));

    Ok(Json(resp))
}

/// POST /api/v1/sessions/:id/messages - Send a user message and get the reply.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<SendMessageResponse>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let session_id = parse_uuid(&id)?;
    let reply = state.orchestrator.send(session_id, &body.content).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(SendMessageResponse { reply }, request_id, elapsed)
        .with_link("turns", &format!("/api/v1/sessions/{session_id}/turns"));

    Ok(Json(resp))
}

/// GET /api/v1/sessions/:id/turns - Full transcript for an active session.
pub async fn get_turns(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Turn>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let session_id = parse_uuid(&id)?;
    let turns = state.orchestrator.history(session_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(turns, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{session_id}/turns"));

    Ok(Json(resp))
}

/// POST /api/v1/sessions/:id/save - Persist the session transcript.
pub async fn save_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let session_id = parse_uuid(&id)?;
    let record_id = state.orchestrator.save(session_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({"record_id": record_id}),
        request_id,
        elapsed,
    )
    .with_link("record", &format!("/api/v1/records/{record_id}"));

    Ok(Json(resp))
}

/// DELETE /api/v1/sessions/:id - End a session and drop its in-memory state.
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let session_id = parse_uuid(&id)?;
    state.orchestrator.evict(session_id);
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({"ended": true, "session_id": session_id}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}
