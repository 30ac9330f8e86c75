use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::{
    session::require_user,
    users::{UserDirectory, UserId},
    AppResult, AppState,
};

use super::{
    build_conversations, compose_message, validate_message, ConversationSummary, Interaction,
    InteractionStore,
};

#[derive(Debug, Deserialize)]
pub(crate) struct SendMessage {
    pub(crate) message: String,
}

/// A thread as the viewer sees it; `messages` may be empty.
#[derive(Debug, Serialize)]
pub(crate) struct ThreadView {
    counterpart_id: UserId,
    counterpart_label: String,
    messages: Vec<Interaction>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Sent {
    message: Interaction,
    thread: ThreadView,
}

#[debug_handler(state = AppState)]
pub(crate) async fn inbox(
    State(interactions): State<Arc<dyn InteractionStore>>,
    State(users): State<UserDirectory>,
    session: Session,
) -> AppResult<Json<Vec<ConversationSummary>>> {
    let viewer_id = require_user(&session).await?;

    let history = interactions.query_by_participant(&viewer_id, None).await?;
    let conversations = build_conversations(history, &viewer_id);

    let mut summaries = Vec::with_capacity(conversations.len());
    for conversation in &conversations {
        let label = users.label(conversation.counterpart_id()).await?;
        summaries.push(ConversationSummary::new(conversation, &viewer_id, label));
    }

    Ok(Json(summaries))
}

pub(crate) async fn load_thread(
    interactions: &dyn InteractionStore,
    viewer_id: &str,
    counterpart_id: &str,
) -> AppResult<Vec<Interaction>> {
    let history = interactions
        .query_by_participant(viewer_id, Some(counterpart_id))
        .await?;
    Ok(build_conversations(history, viewer_id)
        .into_iter()
        .next()
        .map(|conversation| conversation.into_messages())
        .unwrap_or_default())
}

#[debug_handler(state = AppState)]
pub(crate) async fn thread(
    Path(counterpart_id): Path<UserId>,
    State(interactions): State<Arc<dyn InteractionStore>>,
    State(users): State<UserDirectory>,
    session: Session,
) -> AppResult<Json<ThreadView>> {
    let viewer_id = require_user(&session).await?;

    let messages = load_thread(interactions.as_ref(), &viewer_id, &counterpart_id).await?;
    let counterpart_label = users.label(&counterpart_id).await?;

    Ok(Json(ThreadView {
        counterpart_id,
        counterpart_label,
        messages,
    }))
}

#[debug_handler(state = AppState)]
pub(crate) async fn send(
    Path(counterpart_id): Path<UserId>,
    State(interactions): State<Arc<dyn InteractionStore>>,
    State(users): State<UserDirectory>,
    session: Session,
    Json(SendMessage { message }): Json<SendMessage>,
) -> AppResult<(StatusCode, Json<Sent>)> {
    let viewer_id = require_user(&session).await?;
    validate_message(&viewer_id, &counterpart_id, &message)?;

    let history = interactions
        .query_by_participant(&viewer_id, Some(&counterpart_id))
        .await?;
    let stored =
        compose_message(interactions.as_ref(), &viewer_id, &counterpart_id, &message).await?;

    let mut conversations = build_conversations(history, &viewer_id);
    let messages = match conversations.pop() {
        Some(conversation) => conversation.append(stored.clone()).into_messages(),
        None => vec![stored.clone()],
    };
    let counterpart_label = users.label(&counterpart_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(Sent {
            message: stored,
            thread: ThreadView {
                counterpart_id,
                counterpart_label,
                messages,
            },
        }),
    ))
}
