//! SQLite-backed listing store using sqlx.
//!
//! The listing document is stored as a JSON blob in a `data` column; id and
//! update time are promoted to columns for lookups and ordering.

use {
    async_trait::async_trait,
    sqlx::{Row, SqlitePool},
};

use crosslist_common::{ListingStatus, Platform, now_ms};

use crate::{
    Error, Result,
    store::ListingStore,
    types::{LegacyChannelRecord, Listing},
};

/// SQLite-backed persistence for listing documents.
pub struct SqliteListingStore {
    pool: SqlitePool,
}

impl SqliteListingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the listings table schema.
    pub async fn init(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS listings (
                id         TEXT    PRIMARY KEY,
                data       TEXT    NOT NULL,
                updated_at INTEGER NOT NULL
            )",
        )
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Read-modify-write on the stored document.
    async fn mutate(&self, id: &str, f: impl FnOnce(&mut Listing)) -> Result<()> {
        let mut listing = self.get(id).await?.ok_or_else(|| Error::not_found(id))?;
        f(&mut listing);
        listing.updated_at = now_ms();
        self.upsert(&listing).await
    }
}

#[async_trait]
impl ListingStore for SqliteListingStore {
    async fn get(&self, id: &str) -> Result<Option<Listing>> {
        let row = sqlx::query("SELECT data FROM listings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => {
                let data: String = row.get("data");
                Ok(Some(serde_json::from_str(&data)?))
            },
            None => Ok(None),
        }
    }

    async fn upsert(&self, listing: &Listing) -> Result<()> {
        let data = serde_json::to_string(listing)?;
        sqlx::query(
            "INSERT INTO listings (id, data, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
               data = excluded.data,
               updated_at = excluded.updated_at",
        )
        .bind(&listing.id)
        .bind(&data)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_status(&self, id: &str, status: ListingStatus) -> Result<()> {
        self.mutate(id, |l| l.status = status).await
    }

    async fn update_price(&self, id: &str, price: f64) -> Result<()> {
        self.mutate(id, |l| l.price = price).await
    }

    async fn set_legacy_channel(
        &self,
        id: &str,
        platform: Platform,
        record: LegacyChannelRecord,
    ) -> Result<()> {
        self.mutate(id, |l| {
            l.cross_post_results
                .insert(platform.as_str().to_string(), record);
        })
        .await
    }

    async fn find_by_legacy_external_id(
        &self,
        platform: Platform,
        external_id: &str,
    ) -> Result<Option<Listing>> {
        // Full scan of the embedded maps. The legacy path only carries
        // pre-migration listings, so the table portion with a non-empty map
        // shrinks over time.
        let rows = sqlx::query("SELECT data FROM listings ORDER BY updated_at DESC")
            .fetch_all(&self.pool)
            .await?;
        for row in rows {
            let data: String = row.get("data");
            let listing: Listing = serde_json::from_str(&data)?;
            if listing
                .cross_post_results
                .get(platform.as_str())
                .is_some_and(|r| r.listing_id == external_id)
            {
                return Ok(Some(listing));
            }
        }
        Ok(None)
    }
}
