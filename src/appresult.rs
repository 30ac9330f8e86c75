use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

use crate::error::{ComposeError, ListingError, NotFound, SignInRequired, ValidationError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

enum Rejection {
    Invalid(Vec<ValidationError>),
    Status(StatusCode),
}

fn rejection(err: &anyhow::Error) -> Option<Rejection> {
    if let Some(invalid) = err.downcast_ref::<ValidationError>() {
        return Some(Rejection::Invalid(vec![*invalid]));
    }
    if let Some(ComposeError::Invalid(invalid)) = err.downcast_ref::<ComposeError>() {
        return Some(Rejection::Invalid(vec![*invalid]));
    }
    if let Some(listing) = err.downcast_ref::<ListingError>() {
        return match listing {
            ListingError::Invalid(errors) => Some(Rejection::Invalid(errors.clone())),
            ListingError::NotFound => Some(Rejection::Status(StatusCode::NOT_FOUND)),
            ListingError::NotOwner => Some(Rejection::Status(StatusCode::FORBIDDEN)),
            ListingError::Persistence(_) => None,
        };
    }
    if err.is::<SignInRequired>() {
        return Some(Rejection::Status(StatusCode::UNAUTHORIZED));
    }
    if err.is::<NotFound>() {
        return Some(Rejection::Status(StatusCode::NOT_FOUND));
    }
    None
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match rejection(&self.0) {
            Some(Rejection::Invalid(errors)) => {
                let errors: Vec<_> = errors
                    .iter()
                    .map(|err| json!({ "code": err, "message": err.to_string() }))
                    .collect();
                let body = Json(json!({ "errors": errors }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            Some(Rejection::Status(status)) => {
                (status, Json(json!({ "error": self.0.to_string() }))).into_response()
            }
            None => {
                tracing::error!("{:#}\n\n{}", self.0, self.0.backtrace());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
