//! Event repository implementation

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::event::{Event, EventStatus};
use crate::utils::errors::SecretSantaError;

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, title: &str, status: EventStatus) -> Result<Event, SecretSantaError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (id, title, status, reveal_enabled, created_at, updated_at)
            VALUES ($1, $2, $3, false, $4, $4)
            RETURNING id, title, status, reveal_enabled, created_at, updated_at
            "#
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, SecretSantaError> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT id, title, status, reveal_enabled, created_at, updated_at FROM events WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Compare-and-set the event status
    pub async fn update_status(
        &self,
        id: Uuid,
        from: EventStatus,
        to: EventStatus,
        reveal_enabled: bool,
    ) -> Result<bool, SecretSantaError> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET status = $3,
                reveal_enabled = $4,
                updated_at = $5
            WHERE id = $1 AND status = $2
            "#
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(reveal_enabled)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
