//! Read side of the session collaborator.
//!
//! An upstream identity provider puts the signed-in user's id under
//! [`USER_ID`]. Nothing in the core writes it except the dev sign-in route.

use std::sync::Arc;

use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    config::Config,
    error::SignInRequired,
    users::{UserDirectory, UserId},
    AppResult, AppState,
};

pub const USER_ID: &str = "user_id";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session/dev", post(dev_sign_in))
        .route("/session/logout", post(logout))
}

pub async fn current_user(session: &Session) -> AppResult<Option<UserId>> {
    Ok(session.get::<UserId>(USER_ID).await?)
}

pub async fn require_user(session: &Session) -> AppResult<UserId> {
    Ok(current_user(session).await?.ok_or(SignInRequired)?)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DevSignIn {
    user_id: String,
    email: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn dev_sign_in(
    State(config): State<Arc<Config>>,
    State(users): State<UserDirectory>,
    session: Session,
    Json(DevSignIn { user_id, email }): Json<DevSignIn>,
) -> AppResult<Response> {
    if !config.dev_login {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Ok(StatusCode::BAD_REQUEST.into_response());
    }

    // The session only names users that have a row.
    let user = users.ensure(user_id, email.as_deref()).await?;
    session.insert(USER_ID, user_id).await?;
    tracing::info!(user_id, "welcome");

    Ok(Json(user).into_response())
}

#[debug_handler]
pub(crate) async fn logout(session: Session) -> AppResult<StatusCode> {
    session.clear().await;
    Ok(StatusCode::NO_CONTENT)
}
