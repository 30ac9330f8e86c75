use serde::Serialize;
use thiserror::Error;

/// User-correctable problems with a message or a listing draft.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Please enter a message")]
    EmptyMessage,

    #[error("Message must be at most 500 characters")]
    MessageTooLong,

    #[error("You cannot send messages to yourself")]
    SelfMessaging,

    #[error("Title is required")]
    TitleRequired,

    #[error("Title must be at least 5 characters long")]
    TitleTooShort,

    #[error("Description is required")]
    DescriptionRequired,

    #[error("Description must be at least 20 characters long")]
    DescriptionTooShort,

    #[error("Price must be a valid positive number")]
    InvalidPrice,

    #[error("Location is required")]
    LocationRequired,

    #[error("Location must be at least 3 characters long")]
    LocationTooShort,
}

/// A store adapter could not complete a read or write.
///
/// Never retried here; callers decide whether to resubmit.
#[derive(Error, Debug)]
pub enum PersistenceFailure {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceFailure),
}

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("listing draft has {} problem(s)", .0.len())]
    Invalid(Vec<ValidationError>),

    #[error("listing not found")]
    NotFound,

    #[error("only the listing's owner may change it")]
    NotOwner,

    #[error(transparent)]
    Persistence(#[from] PersistenceFailure),
}

#[derive(Error, Debug)]
#[error("sign in required")]
pub struct SignInRequired;

#[derive(Error, Debug)]
#[error("{0} not found")]
pub struct NotFound(pub &'static str);
