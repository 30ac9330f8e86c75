use async_trait::async_trait;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::PersistenceFailure;

use super::{Listing, ListingUpdate, NewListing};

/// Persistence contract for listing records.
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn insert(
        &self,
        owner_id: &str,
        listing: NewListing,
    ) -> Result<Listing, PersistenceFailure>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Listing>, PersistenceFailure>;

    /// `None` when no listing has this id.
    async fn update_by_id(
        &self,
        id: Uuid,
        update: ListingUpdate,
    ) -> Result<Option<Listing>, PersistenceFailure>;

    /// `false` when no listing has this id.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, PersistenceFailure>;

    /// One owner's listings, available or not, most recently created first.
    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<Listing>, PersistenceFailure>;

    /// Every available listing, most recently created first.
    async fn query_available(&self) -> Result<Vec<Listing>, PersistenceFailure>;
}

const LISTING_COLUMNS: &str =
    "id,owner_id,title,description,price,location,availability,created_at,updated_at";

#[derive(Clone)]
pub struct SqliteListingStore {
    db_pool: SqlitePool,
}

impl SqliteListingStore {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ListingStore for SqliteListingStore {
    async fn insert(
        &self,
        owner_id: &str,
        NewListing { title, description, price, location, availability }: NewListing,
    ) -> Result<Listing, PersistenceFailure> {
        let now = OffsetDateTime::now_utc();
        let listing: Listing = sqlx::query_as(&format!(
            "INSERT INTO listings ({LISTING_COLUMNS}) VALUES (?,?,?,?,?,?,?,?,?) \
             RETURNING {LISTING_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(owner_id)
        .bind(&title)
        .bind(&description)
        .bind(price)
        .bind(&location)
        .bind(availability)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::debug!(id = %listing.id, owner_id, "listing stored");
        Ok(listing)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Listing>, PersistenceFailure> {
        Ok(
            sqlx::query_as(&format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id=?"))
                .bind(id)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        ListingUpdate { title, description, price, location, availability }: ListingUpdate,
    ) -> Result<Option<Listing>, PersistenceFailure> {
        let updated: Option<Listing> = sqlx::query_as(&format!(
            "UPDATE listings SET \
                title=COALESCE(?,title), \
                description=COALESCE(?,description), \
                price=COALESCE(?,price), \
                location=COALESCE(?,location), \
                availability=COALESCE(?,availability), \
                updated_at=? \
             WHERE id=? RETURNING {LISTING_COLUMNS}"
        ))
        .bind(title)
        .bind(description)
        .bind(price)
        .bind(location)
        .bind(availability)
        .bind(OffsetDateTime::now_utc())
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        tracing::debug!(%id, found = updated.is_some(), "listing update");
        Ok(updated)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, PersistenceFailure> {
        let result = sqlx::query("DELETE FROM listings WHERE id=?")
            .bind(id)
            .execute(&self.db_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<Listing>, PersistenceFailure> {
        Ok(
            sqlx::query_as(&format!(
                "SELECT {LISTING_COLUMNS} FROM listings WHERE owner_id=? ORDER BY rowid DESC"
            ))
            .bind(owner_id)
            .fetch_all(&self.db_pool)
            .await?,
        )
    }

    async fn query_available(&self) -> Result<Vec<Listing>, PersistenceFailure> {
        Ok(
            sqlx::query_as(&format!(
                "SELECT {LISTING_COLUMNS} FROM listings WHERE availability=1 ORDER BY rowid DESC"
            ))
            .fetch_all(&self.db_pool)
            .await?,
        )
    }
}
