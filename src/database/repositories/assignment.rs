//! Assignment repository implementation

use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::assignment::{Assignment, Pairing};
use crate::utils::errors::SecretSantaError;

#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Count assignments already stored for an event
    pub async fn count_for_event(&self, event_id: Uuid) -> Result<i64, SecretSantaError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM assignments WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Insert all pairings as one multi-row statement.
    ///
    /// A single INSERT is atomic, so either every row lands or none does. The
    /// `(event_id, giver_id)` unique constraint turns a concurrent second batch
    /// into `AlreadyAssigned`.
    pub async fn insert_batch(&self, event_id: Uuid, pairings: &[Pairing]) -> Result<u64, SecretSantaError> {
        if pairings.is_empty() {
            return Ok(0);
        }

        let created_at = Utc::now();
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO assignments (id, event_id, giver_id, receiver_id, created_at) ");
        builder.push_values(pairings, |mut row, pairing| {
            row.push_bind(Uuid::new_v4())
                .push_bind(event_id)
                .push_bind(pairing.giver)
                .push_bind(pairing.receiver)
                .push_bind(created_at);
        });

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(SecretSantaError::from_assignment_insert)?;

        Ok(result.rows_affected())
    }

    /// List assignments for an event
    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Assignment>, SecretSantaError> {
        let assignments = sqlx::query_as::<_, Assignment>(
            "SELECT id, event_id, giver_id, receiver_id, created_at FROM assignments WHERE event_id = $1 ORDER BY giver_id ASC"
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    /// Find the assignment where the user is the giver
    pub async fn find_by_giver(&self, event_id: Uuid, giver_id: Uuid) -> Result<Option<Assignment>, SecretSantaError> {
        let assignment = sqlx::query_as::<_, Assignment>(
            "SELECT id, event_id, giver_id, receiver_id, created_at FROM assignments WHERE event_id = $1 AND giver_id = $2"
        )
        .bind(event_id)
        .bind(giver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assignment)
    }
}
