//! Participant repository implementation

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::participant::Participant;
use crate::utils::errors::SecretSantaError;

#[derive(Debug, Clone)]
pub struct ParticipantRepository {
    pool: PgPool,
}

impl ParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a user for an event
    pub async fn add(&self, event_id: Uuid, user_id: Uuid, is_active: bool) -> Result<Participant, SecretSantaError> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"
            INSERT INTO participants (id, event_id, user_id, is_active, joined_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, event_id, user_id, is_active, joined_at
            "#
        )
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(user_id)
        .bind(is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(participant)
    }

    /// User ids of active participants, oldest registration first
    pub async fn active_user_ids(&self, event_id: Uuid) -> Result<Vec<Uuid>, SecretSantaError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT user_id FROM participants WHERE event_id = $1 AND is_active = true ORDER BY joined_at ASC, user_id ASC"
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
    }
}
