//! Database service layer
//!
//! This module provides a high-level interface to database operations and
//! exposes them to the generator through [`ExchangeStore`].

use async_trait::async_trait;
use std::time::Instant;
use uuid::Uuid;

use crate::database::{
    connection, AssignmentRepository, DatabasePool, EventRepository, ExchangeStore, ParticipantRepository,
};
use crate::models::{Assignment, Event, EventStatus, Pairing};
use crate::utils::errors::Result;
use crate::utils::logging::log_database_operation;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub events: EventRepository,
    pub participants: ParticipantRepository,
    pub assignments: AssignmentRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            participants: ParticipantRepository::new(pool.clone()),
            assignments: AssignmentRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl ExchangeStore for DatabaseService {
    async fn find_event(&self, event_id: Uuid) -> Result<Option<Event>> {
        self.events.find_by_id(event_id).await
    }

    async fn load_active_participants(&self, event_id: Uuid) -> Result<Vec<Uuid>> {
        self.participants.active_user_ids(event_id).await
    }

    async fn count_assignments(&self, event_id: Uuid) -> Result<i64> {
        self.assignments.count_for_event(event_id).await
    }

    async fn commit_assignments(&self, event_id: Uuid, pairings: &[Pairing]) -> Result<u64> {
        let started = Instant::now();
        let result = self.assignments.insert_batch(event_id, pairings).await;
        log_database_operation(
            "insert_batch",
            "assignments",
            started.elapsed().as_millis() as u64,
            result.is_ok(),
        );
        result
    }

    async fn transition_event_status(
        &self,
        event_id: Uuid,
        from: EventStatus,
        to: EventStatus,
        reveal_enabled: bool,
    ) -> Result<bool> {
        let started = Instant::now();
        let result = self.events.update_status(event_id, from, to, reveal_enabled).await;
        log_database_operation(
            "update_status",
            "events",
            started.elapsed().as_millis() as u64,
            result.is_ok(),
        );
        result
    }

    async fn list_assignments(&self, event_id: Uuid) -> Result<Vec<Assignment>> {
        self.assignments.list_for_event(event_id).await
    }

    async fn find_assignment_for_giver(&self, event_id: Uuid, giver_id: Uuid) -> Result<Option<Assignment>> {
        self.assignments.find_by_giver(event_id, giver_id).await
    }

    async fn health_check(&self) -> Result<()> {
        connection::health_check(&self.pool).await
    }
}
