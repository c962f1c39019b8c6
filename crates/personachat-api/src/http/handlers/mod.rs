//! HTTP request handlers, grouped by resource.

pub mod chat;
pub mod persona;
pub mod record;

use uuid::Uuid;

use crate::http::error::AppError;

/// Parse a path segment as a UUID, rejecting malformed IDs with a 400.
pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("'{raw}' is not a valid session or record id")))
}
