//! ConversationStore trait definition.
//!
//! Durable persistence contract for saved conversations. Implementations
//! live in personachat-infra (e.g., `SqliteConversationStore`). Uses native
//! async fn in traits (RPITIT, Rust 2024 edition).

use personachat_types::conversation::{ConversationRecord, RecordSummary};
use personachat_types::error::StoreError;
use uuid::Uuid;

/// Repository trait for durable conversation snapshots.
///
/// Records are keyed by session id: persisting a record whose id already
/// exists atomically replaces the prior snapshot. Records are never mutated
/// in place.
pub trait ConversationStore: Send + Sync {
    /// Persist a snapshot, overwriting any prior record with the same id.
    /// Returns the record id.
    fn persist(
        &self,
        record: &ConversationRecord,
    ) -> impl std::future::Future<Output = Result<Uuid, StoreError>> + Send;

    /// Fetch one record with its full turn history.
    fn get(
        &self,
        record_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<ConversationRecord, StoreError>> + Send;

    /// List record summaries (no turn bodies), newest first.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<RecordSummary>, StoreError>> + Send;
}
