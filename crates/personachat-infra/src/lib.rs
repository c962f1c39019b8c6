//! Infrastructure layer for personachat.
//!
//! Contains implementations of the traits defined in `personachat-core`:
//! the SQLite conversation store, the Gemini HTTP provider, configuration
//! loading, and environment secret lookup.

pub mod config;
pub mod gemini;
pub mod secret;
pub mod sqlite;
