//! Store capabilities required by the assignment generator
//!
//! The generator never talks to a concrete database. It sees only this trait,
//! which is implemented by the PostgreSQL [`DatabaseService`](super::DatabaseService)
//! and by the in-memory [`InMemoryStore`](super::InMemoryStore).

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Assignment, Event, EventStatus, Pairing};
use crate::utils::errors::Result;

#[async_trait]
pub trait ExchangeStore: Send + Sync {
    async fn find_event(&self, event_id: Uuid) -> Result<Option<Event>>;

    /// User ids of active participants, in a stable order
    async fn load_active_participants(&self, event_id: Uuid) -> Result<Vec<Uuid>>;

    async fn count_assignments(&self, event_id: Uuid) -> Result<i64>;

    /// Insert every pairing or none of them.
    ///
    /// Fails with `AlreadyAssigned` when a giver or receiver already has an
    /// assignment for the event.
    async fn commit_assignments(&self, event_id: Uuid, pairings: &[Pairing]) -> Result<u64>;

    /// Move the event from `from` to `to`. Returns `false` when the event was
    /// not in `from` (or no longer exists) and nothing was changed.
    async fn transition_event_status(
        &self,
        event_id: Uuid,
        from: EventStatus,
        to: EventStatus,
        reveal_enabled: bool,
    ) -> Result<bool>;

    async fn list_assignments(&self, event_id: Uuid) -> Result<Vec<Assignment>>;

    async fn find_assignment_for_giver(&self, event_id: Uuid, giver_id: Uuid) -> Result<Option<Assignment>>;

    async fn health_check(&self) -> Result<()>;
}
