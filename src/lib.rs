pub mod config;
pub mod db;
pub mod error;
pub mod listings;
pub mod messages;
pub mod session;
pub mod users;

mod appresult;

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

pub use appresult::{AppError, AppResult};
pub use config::Config;

use listings::{ListingStore, SqliteListingStore};
use messages::{InteractionStore, SqliteInteractionStore};
use users::UserDirectory;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub interactions: Arc<dyn InteractionStore>,
    pub listings: Arc<dyn ListingStore>,
    pub users: UserDirectory,
    pub config: Arc<Config>,
}

impl AppState {
    /// State backed by SQLite stores sharing `db_pool`.
    pub fn new(db_pool: SqlitePool, config: Config) -> Self {
        Self {
            interactions: Arc::new(SqliteInteractionStore::new(db_pool.clone())),
            listings: Arc::new(SqliteListingStore::new(db_pool.clone())),
            users: UserDirectory::new(db_pool.clone()),
            config: Arc::new(config),
            db_pool,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(state.config.session_inactivity));

    let cors = state.config.cors_origin.clone().map(|origin| {
        CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
    });

    let app = Router::new()
        .route("/health", get(health))
        .merge(session::router())
        .merge(users::router())
        .merge(listings::router())
        .merge(messages::router())
        .with_state(state)
        .layer(session_layer);

    let app = match cors {
        Some(cors) => app.layer(cors),
        None => app,
    };

    app.layer(TraceLayer::new_for_http())
}

pub async fn health(State(db_pool): State<SqlitePool>) -> StatusCode {
    match db_pool.acquire().await {
        Ok(_) => StatusCode::OK,
        Err(err) => {
            tracing::warn!("database unavailable: {err}");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
