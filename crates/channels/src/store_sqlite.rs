//! SQLite-backed channel store.

use {async_trait::async_trait, sqlx::SqlitePool};

use crosslist_common::{ChannelStatus, Platform, now_ms};

use crate::{
    Error, Result,
    store::{ChannelListing, ChannelStore},
};

/// Internal row type for sqlx mapping.
#[derive(sqlx::FromRow)]
struct ChannelRow {
    listing_id: String,
    platform: String,
    external_id: String,
    status: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<ChannelRow> for ChannelListing {
    type Error = Error;

    fn try_from(r: ChannelRow) -> Result<Self> {
        let platform = Platform::parse(&r.platform)
            .ok_or_else(|| Error::not_found(format!("unknown platform in row: {}", r.platform)))?;
        let status = ChannelStatus::parse(&r.status)
            .ok_or_else(|| Error::not_found(format!("unknown channel status: {}", r.status)))?;
        Ok(Self {
            listing_id: r.listing_id,
            platform,
            external_id: r.external_id,
            status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// SQLite-backed channel registry rows.
pub struct SqliteChannelStore {
    pool: SqlitePool,
}

impl SqliteChannelStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the channel_listings table schema.
    pub async fn init(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS channel_listings (
                listing_id  TEXT    NOT NULL,
                platform    TEXT    NOT NULL,
                external_id TEXT    NOT NULL,
                status      TEXT    NOT NULL DEFAULT 'active',
                created_at  INTEGER NOT NULL,
                updated_at  INTEGER NOT NULL,
                UNIQUE (listing_id, platform)
            )"#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_channel_listings_external
             ON channel_listings (platform, external_id)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ChannelStore for SqliteChannelStore {
    async fn upsert(&self, channel: ChannelListing) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO channel_listings
                 (listing_id, platform, external_id, status, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT(listing_id, platform) DO UPDATE SET
                 external_id = excluded.external_id,
                 status = excluded.status,
                 updated_at = excluded.updated_at"#,
        )
        .bind(&channel.listing_id)
        .bind(channel.platform.as_str())
        .bind(&channel.external_id)
        .bind(channel.status.as_str())
        .bind(channel.created_at)
        .bind(channel.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, listing_id: &str, platform: Platform) -> Result<Option<ChannelListing>> {
        let row = sqlx::query_as::<_, ChannelRow>(
            "SELECT * FROM channel_listings WHERE listing_id = ? AND platform = ?",
        )
        .bind(listing_id)
        .bind(platform.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_external_id(
        &self,
        platform: Platform,
        external_id: &str,
    ) -> Result<Option<ChannelListing>> {
        let row = sqlx::query_as::<_, ChannelRow>(
            "SELECT * FROM channel_listings WHERE platform = ? AND external_id = ?",
        )
        .bind(platform.as_str())
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(TryInto::try_into).transpose()
    }

    async fn list_for_listing(&self, listing_id: &str) -> Result<Vec<ChannelListing>> {
        let rows = sqlx::query_as::<_, ChannelRow>(
            "SELECT * FROM channel_listings WHERE listing_id = ? ORDER BY platform",
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn set_status(
        &self,
        listing_id: &str,
        platform: Platform,
        status: ChannelStatus,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE channel_listings SET status = ?, updated_at = ?
             WHERE listing_id = ? AND platform = ?",
        )
        .bind(status.as_str())
        .bind(now_ms())
        .bind(listing_id)
        .bind(platform.as_str())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(Error::not_found(format!(
                "no channel for listing {listing_id} on {platform}"
            )));
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    async fn make_store() -> SqliteChannelStore {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        SqliteChannelStore::init(&pool).await.unwrap();
        SqliteChannelStore::new(pool)
    }

    fn channel(listing_id: &str, platform: Platform, external_id: &str) -> ChannelListing {
        ChannelListing {
            listing_id: listing_id.into(),
            platform,
            external_id: external_id.into(),
            status: ChannelStatus::Active,
            created_at: now_ms(),
            updated_at: now_ms(),
        }
    }

    #[tokio::test]
    async fn upsert_and_get() {
        let store = make_store().await;
        store
            .upsert(channel("l1", Platform::Ebay, "ebay_1"))
            .await
            .unwrap();

        let got = store.get("l1", Platform::Ebay).await.unwrap().unwrap();
        assert_eq!(got.external_id, "ebay_1");
        assert_eq!(got.status, ChannelStatus::Active);
    }

    #[tokio::test]
    async fn listing_platform_pair_is_unique() {
        let store = make_store().await;
        store
            .upsert(channel("l1", Platform::Ebay, "ebay_1"))
            .await
            .unwrap();
        store
            .upsert(channel("l1", Platform::Ebay, "ebay_2"))
            .await
            .unwrap();

        let all = store.list_for_listing("l1").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].external_id, "ebay_2");
    }

    #[tokio::test]
    async fn find_by_external_id_scopes_platform() {
        let store = make_store().await;
        store
            .upsert(channel("l1", Platform::Ebay, "shared_id"))
            .await
            .unwrap();

        let hit = store
            .find_by_external_id(Platform::Ebay, "shared_id")
            .await
            .unwrap();
        assert_eq!(hit.unwrap().listing_id, "l1");

        let miss = store
            .find_by_external_id(Platform::Facebook, "shared_id")
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn set_status_transitions() {
        let store = make_store().await;
        store
            .upsert(channel("l1", Platform::Facebook, "fb_1"))
            .await
            .unwrap();

        store
            .set_status("l1", Platform::Facebook, ChannelStatus::Ended)
            .await
            .unwrap();

        let got = store.get("l1", Platform::Facebook).await.unwrap().unwrap();
        assert_eq!(got.status, ChannelStatus::Ended);
    }

    #[tokio::test]
    async fn set_status_missing_row_errors() {
        let store = make_store().await;
        let err = store
            .set_status("ghost", Platform::Ebay, ChannelStatus::Ended)
            .await
            .expect_err("should fail");
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_for_listing_spans_platforms() {
        let store = make_store().await;
        store
            .upsert(channel("l1", Platform::Ebay, "ebay_1"))
            .await
            .unwrap();
        store
            .upsert(channel("l1", Platform::Facebook, "fb_1"))
            .await
            .unwrap();
        store
            .upsert(channel("l2", Platform::Ebay, "ebay_2"))
            .await
            .unwrap();

        let all = store.list_for_listing("l1").await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
