mod discover;
mod handlers;
mod listing;
mod manage;
mod store;
mod validate;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub use discover::discover;
pub use listing::{Listing, ListingDraft, ListingUpdate, NewListing, PriceInput, SortKey};
pub use manage::{create_listing, delete_listing, find_listing, toggle_availability, update_listing};
pub use store::{ListingStore, SqliteListingStore};
pub use validate::{
    validate_listing_draft, MIN_DESCRIPTION_CHARS, MIN_LOCATION_CHARS, MIN_TITLE_CHARS,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/listings", get(handlers::browse).post(handlers::create))
        .route("/listings/mine", get(handlers::mine))
        .route(
            "/listings/{id}",
            get(handlers::detail).put(handlers::update).delete(handlers::delete),
        )
        .route("/listings/{id}/availability", post(handlers::availability))
        .route("/listings/{id}/messages", post(handlers::contact_host))
}
