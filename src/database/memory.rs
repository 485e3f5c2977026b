//! In-memory store
//!
//! Keeps events, participants and assignments in process memory. It enforces
//! the same uniqueness rules as the PostgreSQL schema, so generation races
//! behave the same way against either store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::database::ExchangeStore;
use crate::models::{Assignment, Event, EventStatus, Pairing, Participant};
use crate::utils::errors::{Result, SecretSantaError};

#[derive(Debug, Default)]
struct MemoryState {
    events: HashMap<Uuid, Event>,
    participants: Vec<Participant>,
    assignments: Vec<Assignment>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        // no invariant spans a panic point inside the lock
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create an event in the given status
    pub fn insert_event(&self, title: &str, status: EventStatus) -> Event {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: title.to_string(),
            status: status.as_str().to_string(),
            reveal_enabled: false,
            created_at: now,
            updated_at: now,
        };
        self.state().events.insert(event.id, event.clone());
        event
    }

    /// Register a user for an event
    pub fn add_participant(&self, event_id: Uuid, user_id: Uuid, is_active: bool) -> Participant {
        let participant = Participant {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            is_active,
            joined_at: Utc::now(),
        };
        self.state().participants.push(participant.clone());
        participant
    }

    /// Snapshot of an event
    pub fn event(&self, event_id: Uuid) -> Option<Event> {
        self.state().events.get(&event_id).cloned()
    }

    /// Snapshot of the assignments of an event, in insertion order
    pub fn assignments(&self, event_id: Uuid) -> Vec<Assignment> {
        self.state()
            .assignments
            .iter()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ExchangeStore for InMemoryStore {
    async fn find_event(&self, event_id: Uuid) -> Result<Option<Event>> {
        Ok(self.event(event_id))
    }

    async fn load_active_participants(&self, event_id: Uuid) -> Result<Vec<Uuid>> {
        // participants are kept in registration order
        Ok(self
            .state()
            .participants
            .iter()
            .filter(|p| p.event_id == event_id && p.is_active)
            .map(|p| p.user_id)
            .collect())
    }

    async fn count_assignments(&self, event_id: Uuid) -> Result<i64> {
        Ok(self
            .state()
            .assignments
            .iter()
            .filter(|a| a.event_id == event_id)
            .count() as i64)
    }

    async fn commit_assignments(&self, event_id: Uuid, pairings: &[Pairing]) -> Result<u64> {
        let mut state = self.state();

        for pairing in pairings {
            if pairing.giver == pairing.receiver {
                return Err(SecretSantaError::InvalidInput(format!(
                    "Participant {} cannot be assigned to themselves",
                    pairing.giver
                )));
            }
            let taken = state.assignments.iter().any(|a| {
                a.event_id == event_id && (a.giver_id == pairing.giver || a.receiver_id == pairing.receiver)
            });
            if taken {
                return Err(SecretSantaError::AlreadyAssigned);
            }
        }

        let created_at = Utc::now();
        state.assignments.extend(pairings.iter().map(|pairing| Assignment {
            id: Uuid::new_v4(),
            event_id,
            giver_id: pairing.giver,
            receiver_id: pairing.receiver,
            created_at,
        }));

        Ok(pairings.len() as u64)
    }

    async fn transition_event_status(
        &self,
        event_id: Uuid,
        from: EventStatus,
        to: EventStatus,
        reveal_enabled: bool,
    ) -> Result<bool> {
        let mut state = self.state();
        match state.events.get_mut(&event_id) {
            Some(event) if event.status == from.as_str() => {
                event.status = to.as_str().to_string();
                event.reveal_enabled = reveal_enabled;
                event.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_assignments(&self, event_id: Uuid) -> Result<Vec<Assignment>> {
        let mut assignments = self.assignments(event_id);
        assignments.sort_by_key(|a| a.giver_id);
        Ok(assignments)
    }

    async fn find_assignment_for_giver(&self, event_id: Uuid, giver_id: Uuid) -> Result<Option<Assignment>> {
        Ok(self
            .state()
            .assignments
            .iter()
            .find(|a| a.event_id == event_id && a.giver_id == giver_id)
            .cloned())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_inactive_participants_are_excluded() {
        let store = InMemoryStore::new();
        let event = store.insert_event("Office party", EventStatus::Open);
        let active = Uuid::new_v4();
        store.add_participant(event.id, active, true);
        store.add_participant(event.id, Uuid::new_v4(), false);

        let loaded = store.load_active_participants(event.id).await.unwrap();
        assert_eq!(loaded, vec![active]);
    }

    #[tokio::test]
    async fn test_second_batch_for_same_giver_is_rejected_atomically() {
        let store = InMemoryStore::new();
        let event = store.insert_event("Office party", EventStatus::Open);
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let first = [Pairing { giver: a, receiver: b }];
        assert_eq!(store.commit_assignments(event.id, &first).await.unwrap(), 1);

        let second = [Pairing { giver: c, receiver: a }, Pairing { giver: a, receiver: c }];
        assert_matches!(
            store.commit_assignments(event.id, &second).await,
            Err(SecretSantaError::AlreadyAssigned)
        );
        assert_eq!(store.assignments(event.id).len(), 1);
    }

    #[tokio::test]
    async fn test_transition_requires_expected_status() {
        let store = InMemoryStore::new();
        let event = store.insert_event("Office party", EventStatus::Draft);

        let moved = store
            .transition_event_status(event.id, EventStatus::Open, EventStatus::Assigned, true)
            .await
            .unwrap();
        assert!(!moved);
        assert_eq!(store.event(event.id).unwrap().status, "draft");
    }
}
