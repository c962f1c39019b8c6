//! Conversation session and durable record types.
//!
//! A `ConversationSession` is the mutable in-memory record of one active
//! conversation. A `ConversationRecord` is the immutable durable snapshot
//! created by an explicit save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::turn::Turn;

/// Mutable in-memory record of one active conversation.
///
/// Invariants (enforced by the orchestrator, not by this struct):
/// - the first turn, if any, is always a `system` turn derived from the
///   persona's system prompt;
/// - `user` and `assistant` turns strictly alternate after it, starting
///   with `user`.
///
/// `saved` is an orthogonal flag: a saved session remains valid for
/// further chatting and can be saved again (overwriting the snapshot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    pub id: Uuid,
    pub persona_key: String,
    pub turns: Vec<Turn>,
    pub created_at: DateTime<Utc>,
    /// Whether at least one durable snapshot of this session exists.
    pub saved: bool,
}

impl ConversationSession {
    /// Create a session seeded with a single system turn.
    pub fn seeded(id: Uuid, persona_key: impl Into<String>, system_prompt: &str) -> Self {
        Self {
            id,
            persona_key: persona_key.into(),
            turns: vec![Turn::now(crate::turn::TurnRole::System, system_prompt)],
            created_at: Utc::now(),
            saved: false,
        }
    }
}

/// Durable, immutable snapshot of a conversation's turns at save time.
///
/// `id` equals the session id: re-saving the same session overwrites the
/// prior record atomically rather than versioning it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: Uuid,
    pub persona_key: String,
    pub turns: Vec<Turn>,
    pub saved_at: DateTime<Utc>,
}

/// Listing view of a saved record: no turn bodies, to bound response size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: Uuid,
    pub persona_key: String,
    pub turn_count: u32,
    pub saved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::TurnRole;

    #[test]
    fn test_seeded_session_starts_with_system_turn() {
        let session = ConversationSession::seeded(Uuid::now_v7(), "analyst", "You analyze data.");
        assert_eq!(session.turns.len(), 1);
        assert_eq!(session.turns[0].role, TurnRole::System);
        assert_eq!(session.turns[0].content, "You analyze data.");
        assert!(!session.saved);
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let record = ConversationRecord {
            id: Uuid::now_v7(),
            persona_key: "analyst".to_string(),
            turns: vec![
                Turn::now(TurnRole::System, "prompt"),
                Turn::now(TurnRole::User, "question"),
                Turn::now(TurnRole::Assistant, "answer"),
            ],
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ConversationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, record.id);
        assert_eq!(parsed.turns.len(), 3);
        assert_eq!(parsed.turns[2].role, TurnRole::Assistant);
    }
}
