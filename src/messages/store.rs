use async_trait::async_trait;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::PersistenceFailure;

use super::{Interaction, NewInteraction};

/// Persistence contract for interaction records.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Stores one interaction, assigning `id` and `recorded_at`.
    async fn insert(&self, interaction: NewInteraction) -> Result<Interaction, PersistenceFailure>;

    /// Every interaction touching `user_id` in either role, in insertion order.
    /// With `counterpart_id`, only the ones between the two users.
    async fn query_by_participant(
        &self,
        user_id: &str,
        counterpart_id: Option<&str>,
    ) -> Result<Vec<Interaction>, PersistenceFailure>;
}

const INTERACTION_COLUMNS: &str = "id,sender_id,counterpart_id,message,timestamp,recorded_at";

#[derive(Clone)]
pub struct SqliteInteractionStore {
    db_pool: SqlitePool,
}

impl SqliteInteractionStore {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl InteractionStore for SqliteInteractionStore {
    async fn insert(
        &self,
        NewInteraction { sender_id, counterpart_id, message, timestamp }: NewInteraction,
    ) -> Result<Interaction, PersistenceFailure> {
        let stored: Interaction = sqlx::query_as(&format!(
            "INSERT INTO interactions ({INTERACTION_COLUMNS}) VALUES (?,?,?,?,?,?) \
             RETURNING {INTERACTION_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(&sender_id)
        .bind(&counterpart_id)
        .bind(&message)
        .bind(timestamp)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(&self.db_pool)
        .await?;

        tracing::debug!(id = %stored.id, %sender_id, %counterpart_id, "interaction stored");
        Ok(stored)
    }

    async fn query_by_participant(
        &self,
        user_id: &str,
        counterpart_id: Option<&str>,
    ) -> Result<Vec<Interaction>, PersistenceFailure> {
        let rows: Vec<Interaction> = match counterpart_id {
            Some(counterpart_id) => {
                sqlx::query_as(&format!(
                    "SELECT {INTERACTION_COLUMNS} FROM interactions \
                     WHERE (sender_id=? AND counterpart_id=?) \
                        OR (sender_id=? AND counterpart_id=?) \
                     ORDER BY rowid"
                ))
                .bind(user_id)
                .bind(counterpart_id)
                .bind(counterpart_id)
                .bind(user_id)
                .fetch_all(&self.db_pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {INTERACTION_COLUMNS} FROM interactions \
                     WHERE sender_id=? OR counterpart_id=? ORDER BY rowid"
                ))
                .bind(user_id)
                .bind(user_id)
                .fetch_all(&self.db_pool)
                .await?
            }
        };

        tracing::debug!(user_id, ?counterpart_id, count = rows.len(), "interactions loaded");
        Ok(rows)
    }
}
