//! Shared domain types for personachat.
//!
//! This crate contains the core domain types used across the platform:
//! Persona, Turn, ConversationSession, ConversationRecord, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod persona;
pub mod turn;
