//! Chat orchestrator: session lifecycle, turn ordering, provider retries.
//!
//! The orchestrator owns the in-memory session table and is the only
//! component that mutates sessions. Per-session mutual exclusion comes from
//! an `Arc<tokio::Mutex<_>>` per entry (not a global lock, so unrelated
//! conversations never serialize against each other); the DashMap shards
//! cover table-level concurrency.
//!
//! Concurrency policy: at most one in-flight `send` per session. A second
//! concurrent `send` fails fast with `ChatError::SessionBusy` rather than
//! queueing behind provider latency. `history` and `save` block until an
//! in-flight exchange completes, so readers never observe a half-appended
//! exchange.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use personachat_types::conversation::{ConversationRecord, ConversationSession, RecordSummary};
use personachat_types::error::{ChatError, GenerationError, StoreError};
use personachat_types::turn::{Turn, TurnRole};

use crate::catalog::PersonaCatalog;
use crate::context::window_turns;
use crate::provider::{GenerationProvider, GenerationReply, GenerationRequest};
use crate::retry::RetryPolicy;
use crate::store::ConversationStore;

/// Orchestrates conversation sessions against a generation provider and a
/// durable store.
///
/// Generic over `GenerationProvider` and `ConversationStore` so the core
/// stays testable with fakes (personachat-core never depends on
/// personachat-infra).
pub struct ChatOrchestrator<P: GenerationProvider, S: ConversationStore> {
    catalog: Arc<PersonaCatalog>,
    provider: P,
    store: S,
    sessions: DashMap<Uuid, Arc<Mutex<ConversationSession>>>,
    policy: RetryPolicy,
    /// Global context-window default; personas may override per-key.
    default_window: usize,
}

impl<P: GenerationProvider, S: ConversationStore> ChatOrchestrator<P, S> {
    pub fn new(
        catalog: Arc<PersonaCatalog>,
        provider: P,
        store: S,
        policy: RetryPolicy,
        default_window: usize,
    ) -> Self {
        Self {
            catalog,
            provider,
            store,
            sessions: DashMap::new(),
            policy,
            default_window,
        }
    }

    /// The injected persona catalog.
    pub fn catalog(&self) -> &PersonaCatalog {
        &self.catalog
    }

    /// Number of sessions currently held in memory.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    // --- Session lifecycle ---

    /// Start a new session for a persona.
    ///
    /// Allocates a fresh UUIDv7 id and seeds the history with one system
    /// turn from the persona's system prompt. No provider call happens here.
    pub fn start(&self, persona_key: &str) -> Result<Uuid, ChatError> {
        let key = persona_key.trim();
        if key.is_empty() {
            return Err(ChatError::InvalidInput(
                "persona key must not be empty".to_string(),
            ));
        }

        let persona = self.catalog.get(key)?;
        let id = Uuid::now_v7();
        let session = ConversationSession::seeded(id, &persona.key, &persona.system_prompt);
        self.sessions.insert(id, Arc::new(Mutex::new(session)));

        info!(session_id = %id, persona = %persona.key, "Session started");
        Ok(id)
    }

    /// Send a user message and return the assistant reply.
    ///
    /// The user turn is appended before the provider call and remains in the
    /// history even when generation fails: the saved record reflects what
    /// was asked, answered or not. Transient provider failures are retried
    /// within the policy budget; the assistant turn is appended exactly once,
    /// on success.
    pub async fn send(&self, session_id: Uuid, user_text: &str) -> Result<String, ChatError> {
        let text = user_text.trim();
        if text.is_empty() {
            return Err(ChatError::InvalidInput(
                "message must not be empty".to_string(),
            ));
        }

        let entry = self.session_entry(&session_id)?;
        let mut session = entry
            .try_lock()
            .map_err(|_| ChatError::SessionBusy(session_id))?;

        let persona = self.catalog.get(&session.persona_key)?;

        session.turns.push(Turn::now(TurnRole::User, text));

        let window = persona.history_window.unwrap_or(self.default_window);
        let context = window_turns(&session.turns, window);
        let request = GenerationRequest::for_persona(persona, context);

        match self.generate_with_retry(&request, session_id).await {
            Ok(reply) => {
                session
                    .turns
                    .push(Turn::now(TurnRole::Assistant, reply.content.as_str()));
                debug!(
                    session_id = %session_id,
                    turns = session.turns.len(),
                    "Assistant turn appended"
                );
                Ok(reply.content)
            }
            Err(err) => {
                // The user turn stays appended; the caller can distinguish
                // "asked but unanswered" from "nothing happened".
                warn!(session_id = %session_id, error = %err, "Generation failed");
                Err(ChatError::Generation(err))
            }
        }
    }

    /// Read-only snapshot of a session's turn history.
    pub async fn history(&self, session_id: Uuid) -> Result<Vec<Turn>, ChatError> {
        let entry = self.session_entry(&session_id)?;
        let session = entry.lock().await;
        Ok(session.turns.clone())
    }

    /// Persist a snapshot of the session's current turns.
    ///
    /// The record id equals the session id; re-saving overwrites the prior
    /// snapshot atomically. The in-memory session stays valid for further
    /// chatting.
    pub async fn save(&self, session_id: Uuid) -> Result<Uuid, ChatError> {
        let entry = self.session_entry(&session_id)?;
        let mut session = entry.lock().await;

        let record = ConversationRecord {
            id: session.id,
            persona_key: session.persona_key.clone(),
            turns: session.turns.clone(),
            saved_at: Utc::now(),
        };

        let record_id = self.store.persist(&record).await?;
        session.saved = true;

        info!(session_id = %session_id, record_id = %record_id, "Session saved");
        Ok(record_id)
    }

    /// Remove a session from the in-memory table. Idempotent.
    ///
    /// Never invoked automatically by other operations; an external age-out
    /// policy decides when to call it.
    pub fn evict(&self, session_id: Uuid) {
        if self.sessions.remove(&session_id).is_some() {
            info!(session_id = %session_id, "Session evicted");
        }
    }

    // --- Durable record access ---

    /// Fetch one saved record with its full turns.
    pub async fn record(&self, record_id: Uuid) -> Result<ConversationRecord, ChatError> {
        self.store.get(&record_id).await.map_err(|e| match e {
            StoreError::NotFound => ChatError::RecordNotFound(record_id),
            other => ChatError::Storage(other),
        })
    }

    /// List saved record summaries, newest first.
    pub async fn list_records(&self) -> Result<Vec<RecordSummary>, ChatError> {
        Ok(self.store.list().await?)
    }

    // --- Internals ---

    fn session_entry(
        &self,
        session_id: &Uuid,
    ) -> Result<Arc<Mutex<ConversationSession>>, ChatError> {
        self.sessions
            .get(session_id)
            .map(|e| Arc::clone(e.value()))
            .ok_or(ChatError::SessionNotFound(*session_id))
    }

    /// Call the provider with a per-attempt timeout and bounded retries.
    ///
    /// Attempts are 1-based; attempt 1 plus up to `policy.max_retries`
    /// retries, transient errors only, doubling backoff between attempts.
    async fn generate_with_retry(
        &self,
        request: &GenerationRequest,
        session_id: Uuid,
    ) -> Result<GenerationReply, GenerationError> {
        let mut attempt: u32 = 1;
        loop {
            let result = tokio::time::timeout(self.policy.timeout, self.provider.generate(request))
                .await
                .unwrap_or_else(|_| {
                    Err(GenerationError::Timeout(self.policy.timeout.as_millis() as u64))
                });

            match result {
                Ok(reply) => return Ok(reply),
                Err(err) if self.policy.should_retry(attempt, &err) => {
                    let backoff = self.policy.backoff_for(attempt);
                    warn!(
                        session_id = %session_id,
                        provider = self.provider.name(),
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "Transient provider failure, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
