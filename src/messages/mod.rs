mod compose;
mod conversations;
mod handlers;
mod interaction;
mod store;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub use compose::{compose_message, compose_message_at, validate_message, MAX_MESSAGE_CHARS};
pub use conversations::{build_conversations, Conversation, ConversationSummary, PREVIEW_LEN};
pub use interaction::{Interaction, NewInteraction};
pub use store::{InteractionStore, SqliteInteractionStore};

pub(crate) use handlers::{load_thread, SendMessage};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(handlers::inbox))
        .route("/conversations/{counterpart_id}", get(handlers::thread))
        .route("/conversations/{counterpart_id}/messages", post(handlers::send))
}
