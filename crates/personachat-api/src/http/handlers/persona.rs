//! Persona catalog handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use personachat_types::persona::Persona;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Catalog listing view of a persona. The system prompt is omitted;
/// it is an internal detail of the conversation seed.
#[derive(Debug, Serialize)]
pub struct PersonaView {
    pub key: String,
    pub name: String,
    pub model: String,
    pub temperature: f64,
}

impl From<&Persona> for PersonaView {
    fn from(p: &Persona) -> Self {
        Self {
            key: p.key.clone(),
            name: p.name.clone(),
            model: p.model.clone(),
            temperature: p.temperature,
        }
    }
}

/// GET /api/v1/personas - List all configured personas.
pub async fn list_personas(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PersonaView>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let personas: Vec<PersonaView> = state
        .orchestrator
        .catalog()
        .list()
        .iter()
        .map(PersonaView::from)
        .collect();
    let elapsed = start.elapsed().as_millis() as u64;

    let resp =
        ApiResponse::success(personas, request_id, elapsed).with_link("self", "/api/v1/personas");

    Ok(Json(resp))
}

/// GET /api/v1/personas/:key - Get a single persona by key.
pub async fn get_persona(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<PersonaView>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let persona = state.orchestrator.catalog().get(&key)?;
    let view = PersonaView::from(persona);
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(view, request_id, elapsed)
        .with_link("self", &format!("/api/v1/personas/{key}"))
        .with_link("sessions", &format!("/api/v1/personas/{key}/sessions"));

    Ok(Json(resp))
}
