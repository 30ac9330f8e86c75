use time::OffsetDateTime;

use crate::error::{ComposeError, ValidationError};

use super::{Interaction, InteractionStore, NewInteraction};

pub const MAX_MESSAGE_CHARS: usize = 500;

/// Checks an outbound message, stopping at the first problem.
/// Returns the trimmed text.
pub fn validate_message<'a>(
    viewer_id: &str,
    counterpart_id: &str,
    raw_text: &'a str,
) -> Result<&'a str, ValidationError> {
    let text = raw_text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ValidationError::MessageTooLong);
    }
    if viewer_id == counterpart_id {
        return Err(ValidationError::SelfMessaging);
    }
    Ok(text)
}

/// Validates and stores a message from `viewer_id` to `counterpart_id`,
/// stamped with the current instant.
pub async fn compose_message(
    store: &dyn InteractionStore,
    viewer_id: &str,
    counterpart_id: &str,
    raw_text: &str,
) -> Result<Interaction, ComposeError> {
    let now = OffsetDateTime::now_utc();
    compose_message_at(store, viewer_id, counterpart_id, raw_text, now).await
}

pub async fn compose_message_at(
    store: &dyn InteractionStore,
    viewer_id: &str,
    counterpart_id: &str,
    raw_text: &str,
    timestamp: OffsetDateTime,
) -> Result<Interaction, ComposeError> {
    let message = validate_message(viewer_id, counterpart_id, raw_text)?;

    let stored = store
        .insert(NewInteraction {
            sender_id: viewer_id.to_owned(),
            counterpart_id: counterpart_id.to_owned(),
            message: message.to_owned(),
            timestamp,
        })
        .await
        .inspect_err(|err| tracing::warn!(viewer_id, counterpart_id, "message not stored: {err}"))?;

    tracing::info!(id = %stored.id, viewer_id, counterpart_id, "message sent");
    Ok(stored)
}
