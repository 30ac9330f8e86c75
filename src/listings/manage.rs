use uuid::Uuid;

use crate::error::ListingError;

use super::{Listing, ListingDraft, ListingStore, ListingUpdate};

pub async fn find_listing(store: &dyn ListingStore, id: Uuid) -> Result<Listing, ListingError> {
    store.get_by_id(id).await?.ok_or(ListingError::NotFound)
}

async fn owned_listing(
    store: &dyn ListingStore,
    viewer_id: &str,
    id: Uuid,
) -> Result<Listing, ListingError> {
    let listing = find_listing(store, id).await?;
    if listing.owner_id != viewer_id {
        tracing::warn!(%id, viewer_id, "refused change to someone else's listing");
        return Err(ListingError::NotOwner);
    }
    Ok(listing)
}

pub async fn create_listing(
    store: &dyn ListingStore,
    owner_id: &str,
    draft: ListingDraft,
) -> Result<Listing, ListingError> {
    let new_listing = draft.into_new_listing().map_err(ListingError::Invalid)?;
    let listing = store.insert(owner_id, new_listing).await?;
    tracing::info!(id = %listing.id, owner_id, "listing created");
    Ok(listing)
}

/// Replaces the editable fields. The stored record is untouched unless
/// `viewer_id` owns the listing and the draft is valid, checked in that order.
pub async fn update_listing(
    store: &dyn ListingStore,
    viewer_id: &str,
    id: Uuid,
    draft: ListingDraft,
) -> Result<Listing, ListingError> {
    owned_listing(store, viewer_id, id).await?;

    let availability = draft.availability;
    let new_listing = draft.into_new_listing().map_err(ListingError::Invalid)?;

    // Edits leave availability alone unless the draft sets it.
    let update = ListingUpdate {
        availability,
        ..new_listing.into()
    };
    let listing = store
        .update_by_id(id, update)
        .await?
        .ok_or(ListingError::NotFound)?;
    tracing::info!(%id, "listing updated");
    Ok(listing)
}

pub async fn toggle_availability(
    store: &dyn ListingStore,
    viewer_id: &str,
    id: Uuid,
) -> Result<Listing, ListingError> {
    let current = owned_listing(store, viewer_id, id).await?;

    let update = ListingUpdate {
        availability: Some(!current.availability),
        ..ListingUpdate::default()
    };
    let listing = store
        .update_by_id(id, update)
        .await?
        .ok_or(ListingError::NotFound)?;
    tracing::info!(%id, availability = listing.availability, "listing availability changed");
    Ok(listing)
}

pub async fn delete_listing(
    store: &dyn ListingStore,
    viewer_id: &str,
    id: Uuid,
) -> Result<(), ListingError> {
    owned_listing(store, viewer_id, id).await?;

    if !store.delete_by_id(id).await? {
        return Err(ListingError::NotFound);
    }
    tracing::info!(%id, "listing deleted");
    Ok(())
}
