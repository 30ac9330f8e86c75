use axum::{debug_handler, extract::State, Json};
use tower_sessions::Session;

use crate::{error::NotFound, session::require_user, AppResult, AppState};

use super::{ProfileUpdate, User, UserDirectory};

#[debug_handler(state = AppState)]
pub(crate) async fn me(
    State(users): State<UserDirectory>,
    session: Session,
) -> AppResult<Json<User>> {
    let user_id = require_user(&session).await?;
    let user = users.get(&user_id).await?.ok_or(NotFound("user"))?;
    Ok(Json(user))
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_me(
    State(users): State<UserDirectory>,
    session: Session,
    Json(update): Json<ProfileUpdate>,
) -> AppResult<Json<User>> {
    let user_id = require_user(&session).await?;
    let user = users
        .update_profile(&user_id, update)
        .await?
        .ok_or(NotFound("user"))?;
    tracing::info!(%user_id, "profile updated");
    Ok(Json(user))
}
