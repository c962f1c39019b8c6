//! Saved conversation record handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use personachat_types::conversation::{ConversationRecord, RecordSummary};

use crate::http::error::AppError;
use crate::http::handlers::parse_uuid;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/records - List saved conversations, newest first.
pub async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RecordSummary>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let records = state.orchestrator.list_records().await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp =
        ApiResponse::success(records, request_id, elapsed).with_link("self", "/api/v1/records");

    Ok(Json(resp))
}

/// GET /api/v1/records/:id - Fetch a saved conversation with its full transcript.
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ConversationRecord>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let record_id = parse_uuid(&id)?;
    let record = state.orchestrator.record(record_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(record, request_id, elapsed)
        .with_link("self", &format!("/api/v1/records/{record_id}"));

    Ok(Json(resp))
}
