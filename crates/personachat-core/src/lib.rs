//! Conversation orchestration core for personachat.
//!
//! This crate defines the "ports" (provider and store traits) that the
//! infrastructure layer implements, plus the orchestrator that owns session
//! lifecycle, turn ordering, the context-window policy, and bounded provider
//! retries. It depends only on `personachat-types` -- never on
//! `personachat-infra` or any database/HTTP crate.

pub mod catalog;
pub mod context;
pub mod orchestrator;
pub mod provider;
pub mod retry;
pub mod store;
