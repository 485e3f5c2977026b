//! Assignment service implementation
//!
//! This service owns the Secret-Santa generation flow: precondition checks,
//! derangement generation, batch persistence and the event status transition.
//! It also serves the read side (admin listing and the participant reveal).

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::ExchangeConfig;
use crate::database::ExchangeStore;
use crate::models::{Assignment, Event, EventStatus, GenerationOutcome};
use crate::services::auth::AuthContext;
use crate::services::derangement::generate_derangement;
use crate::services::event_lock::EventLocks;
use crate::utils::errors::{Result, SecretSantaError};
use crate::utils::logging::{log_admin_action, log_exchange_action};

#[derive(Clone)]
pub struct AssignmentService {
    store: Arc<dyn ExchangeStore>,
    locks: EventLocks,
    policy: ExchangeConfig,
}

impl AssignmentService {
    /// Create a new AssignmentService instance
    pub fn new(store: Arc<dyn ExchangeStore>, policy: ExchangeConfig) -> Self {
        Self {
            store,
            locks: EventLocks::new(),
            policy,
        }
    }

    pub fn store(&self) -> &Arc<dyn ExchangeStore> {
        &self.store
    }

    /// Generate and persist Secret-Santa assignments for an open event.
    ///
    /// Preconditions are checked in order and the first failure is returned:
    /// admin permission, event exists, event is open, enough active
    /// participants, no assignments yet. A non-open event that already has
    /// assignments fails with `AlreadyAssigned` rather than `InvalidState`.
    /// Nothing is written unless all pass.
    /// The event only moves to `assigned` after the assignment batch commits.
    #[instrument(skip(self, requester), fields(requester = %requester.user_id))]
    pub async fn generate_assignments(&self, event_id: Uuid, requester: &AuthContext) -> Result<GenerationOutcome> {
        if !requester.is_admin() {
            warn!(user_id = %requester.user_id, event_id = %event_id, "Non-admin attempted to generate assignments");
            return Err(SecretSantaError::PermissionDenied(
                "Only administrators can generate assignments".to_string(),
            ));
        }

        let _lock = self.locks.acquire(event_id).await;

        let event = self.require_event(event_id).await?;
        let status = event.status()?;
        if status != EventStatus::Open {
            // a generated event reports the existing batch, not its new status
            if self.store.count_assignments(event_id).await? > 0 {
                return Err(SecretSantaError::AlreadyAssigned);
            }
            return Err(SecretSantaError::InvalidState { status });
        }

        let participants = self.store.load_active_participants(event_id).await?;
        if participants.len() < self.policy.min_participants {
            return Err(SecretSantaError::InsufficientParticipants {
                found: participants.len(),
                required: self.policy.min_participants,
            });
        }

        if self.store.count_assignments(event_id).await? > 0 {
            return Err(SecretSantaError::AlreadyAssigned);
        }

        debug!(event_id = %event_id, participants = participants.len(), "Generating derangement");
        let pairings = {
            let mut rng = StdRng::from_entropy();
            generate_derangement(&participants, &mut rng, self.policy.max_attempts)
        }
        .ok_or(SecretSantaError::GenerationFailed {
            attempts: self.policy.max_attempts,
        })?;

        let created = self.store.commit_assignments(event_id, &pairings).await?;

        let moved = self
            .store
            .transition_event_status(event_id, EventStatus::Open, EventStatus::Assigned, true)
            .await?;
        if !moved {
            // the batch is committed; a retry will report AlreadyAssigned
            let current = self.require_event(event_id).await?.status()?;
            error!(event_id = %event_id, status = %current, "Event left the open state while assignments were written");
            return Err(SecretSantaError::InvalidState { status: current });
        }

        log_admin_action(
            requester.user_id,
            "generate_assignments",
            Some(&event_id.to_string()),
            Some(&format!("{} assignments created", created)),
        );
        info!(event_id = %event_id, assignments = created, "Secret-Santa assignments generated");

        Ok(GenerationOutcome {
            event_id,
            assignments_count: created as usize,
        })
    }

    /// List every assignment of an event (admin only)
    pub async fn list_assignments(&self, event_id: Uuid, requester: &AuthContext) -> Result<Vec<Assignment>> {
        if !requester.is_admin() {
            return Err(SecretSantaError::PermissionDenied(
                "Only administrators can view all assignments".to_string(),
            ));
        }

        self.require_event(event_id).await?;
        self.store.list_assignments(event_id).await
    }

    /// The assignment where the requester is the giver, once reveal is enabled
    pub async fn my_assignment(&self, event_id: Uuid, requester: &AuthContext) -> Result<Assignment> {
        let event = self.require_event(event_id).await?;
        if !event.reveal_enabled {
            return Err(SecretSantaError::NotRevealed);
        }

        let assignment = self
            .store
            .find_assignment_for_giver(event_id, requester.user_id)
            .await?
            .ok_or(SecretSantaError::AssignmentNotFound {
                user_id: requester.user_id,
            })?;

        log_exchange_action(event_id, "reveal_assignment", requester.user_id, None);
        Ok(assignment)
    }

    async fn require_event(&self, event_id: Uuid) -> Result<Event> {
        self.store
            .find_event(event_id)
            .await?
            .ok_or(SecretSantaError::EventNotFound { event_id })
    }
}
