//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use personachat_types::error::{ChatError, GenerationError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat orchestration errors.
    Chat(ChatError),
    /// Validation error.
    Validation(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Chat(ChatError::PersonaNotFound(key)) => {
                (StatusCode::NOT_FOUND, "PERSONA_NOT_FOUND", format!("Persona '{key}' not found"))
            }
            AppError::Chat(ChatError::SessionNotFound(id)) => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", format!("Session {id} not found"))
            }
            AppError::Chat(ChatError::RecordNotFound(id)) => {
                (StatusCode::NOT_FOUND, "RECORD_NOT_FOUND", format!("Conversation record {id} not found"))
            }
            AppError::Chat(ChatError::SessionBusy(id)) => {
                (StatusCode::CONFLICT, "SESSION_BUSY", format!("Session {id} already has a message in flight"))
            }
            AppError::Chat(ChatError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::Generation(e)) if e.is_transient() => {
                (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE", e.to_string())
            }
            AppError::Chat(ChatError::Generation(GenerationError::ContentBlocked(reason))) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "CONTENT_BLOCKED", format!("Response blocked by the provider: {reason}"))
            }
            AppError::Chat(ChatError::Generation(e)) => {
                (StatusCode::BAD_GATEWAY, "GENERATION_ERROR", e.to_string())
            }
            AppError::Chat(ChatError::Storage(e)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        };

        let envelope = ApiResponse::<()>::error(code, &message);
        (status, axum::Json(envelope)).into_response()
    }
}
