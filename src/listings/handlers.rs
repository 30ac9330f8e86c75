use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    messages::{compose_message, load_thread, Interaction, InteractionStore, SendMessage},
    session::{current_user, require_user},
    AppResult, AppState,
};

use super::{
    create_listing, delete_listing, discover, find_listing, toggle_availability, update_listing,
    Listing, ListingDraft, ListingStore, SortKey,
};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DiscoverQuery {
    q: Option<String>,
    sort: Option<String>,
}

impl DiscoverQuery {
    fn apply(&self, listings: Vec<Listing>) -> Vec<Listing> {
        discover(
            listings,
            self.q.as_deref().unwrap_or_default(),
            SortKey::from_param(self.sort.as_deref()),
        )
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ListingDetail {
    listing: Listing,
    /// Messages between a signed-in guest and the host; absent for the host
    /// themselves and for anonymous visitors.
    #[serde(skip_serializing_if = "Option::is_none")]
    thread: Option<Vec<Interaction>>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn browse(
    State(listings): State<Arc<dyn ListingStore>>,
    Query(query): Query<DiscoverQuery>,
) -> AppResult<Json<Vec<Listing>>> {
    let available = listings.query_available().await?;
    Ok(Json(query.apply(available)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn mine(
    State(listings): State<Arc<dyn ListingStore>>,
    session: Session,
    Query(query): Query<DiscoverQuery>,
) -> AppResult<Json<Vec<Listing>>> {
    let owner_id = require_user(&session).await?;
    let owned = listings.query_by_owner(&owner_id).await?;
    Ok(Json(query.apply(owned)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn create(
    State(listings): State<Arc<dyn ListingStore>>,
    session: Session,
    Json(draft): Json<ListingDraft>,
) -> AppResult<(StatusCode, Json<Listing>)> {
    let owner_id = require_user(&session).await?;
    let listing = create_listing(listings.as_ref(), &owner_id, draft).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn detail(
    Path(id): Path<Uuid>,
    State(listings): State<Arc<dyn ListingStore>>,
    State(interactions): State<Arc<dyn InteractionStore>>,
    session: Session,
) -> AppResult<Json<ListingDetail>> {
    let listing = find_listing(listings.as_ref(), id).await?;

    let thread = match current_user(&session).await? {
        Some(viewer_id) if viewer_id != listing.owner_id => {
            Some(load_thread(interactions.as_ref(), &viewer_id, &listing.owner_id).await?)
        }
        _ => None,
    };

    Ok(Json(ListingDetail { listing, thread }))
}

#[debug_handler(state = AppState)]
pub(crate) async fn update(
    Path(id): Path<Uuid>,
    State(listings): State<Arc<dyn ListingStore>>,
    session: Session,
    Json(draft): Json<ListingDraft>,
) -> AppResult<Json<Listing>> {
    let viewer_id = require_user(&session).await?;
    Ok(Json(update_listing(listings.as_ref(), &viewer_id, id, draft).await?))
}

#[debug_handler(state = AppState)]
pub(crate) async fn availability(
    Path(id): Path<Uuid>,
    State(listings): State<Arc<dyn ListingStore>>,
    session: Session,
) -> AppResult<Json<Listing>> {
    let viewer_id = require_user(&session).await?;
    Ok(Json(toggle_availability(listings.as_ref(), &viewer_id, id).await?))
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete(
    Path(id): Path<Uuid>,
    State(listings): State<Arc<dyn ListingStore>>,
    session: Session,
) -> AppResult<StatusCode> {
    let viewer_id = require_user(&session).await?;
    delete_listing(listings.as_ref(), &viewer_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Sends a message to the listing's host.
#[debug_handler(state = AppState)]
pub(crate) async fn contact_host(
    Path(id): Path<Uuid>,
    State(listings): State<Arc<dyn ListingStore>>,
    State(interactions): State<Arc<dyn InteractionStore>>,
    session: Session,
    Json(SendMessage { message }): Json<SendMessage>,
) -> AppResult<(StatusCode, Json<Interaction>)> {
    let viewer_id = require_user(&session).await?;
    let listing = find_listing(listings.as_ref(), id).await?;

    let stored = compose_message(
        interactions.as_ref(),
        &viewer_id,
        &listing.owner_id,
        &message,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(stored)))
}
