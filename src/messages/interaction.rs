use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::UserId;

/// One directed message between two users. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Interaction {
    pub id: Uuid,
    pub sender_id: UserId,
    /// The party addressed at send time.
    pub counterpart_id: UserId,
    pub message: String,
    /// Client-assigned; orders messages within a thread.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Store-assigned; audit only.
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

impl Interaction {
    /// The participant that is not `viewer_id`.
    pub fn other_party(&self, viewer_id: &str) -> &str {
        if self.sender_id == viewer_id {
            &self.counterpart_id
        } else {
            &self.sender_id
        }
    }

    pub fn is_from(&self, user_id: &str) -> bool {
        self.sender_id == user_id
    }
}

/// An interaction before the store has given it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInteraction {
    pub sender_id: UserId,
    pub counterpart_id: UserId,
    pub message: String,
    pub timestamp: OffsetDateTime,
}
