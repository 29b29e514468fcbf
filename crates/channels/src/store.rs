//! Canonical channel registry: one row per (listing, platform).

use {async_trait::async_trait, serde::Serialize};

use crosslist_common::{ChannelStatus, Platform};

use crate::Result;

/// One platform's live copy of a listing.
///
/// Created when a publish succeeds; the reconciler moves `status` to
/// `ended`/`archived` when a compensating unpublish runs. Rows are never
/// deleted — history is preserved by status transition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelListing {
    pub listing_id: String,
    pub platform: Platform,
    pub external_id: String,
    pub status: ChannelStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Persistent storage for channel listings.
///
/// The pair `(listing_id, platform)` is unique; `upsert` replaces the
/// existing row for that pair.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    async fn upsert(&self, channel: ChannelListing) -> Result<()>;

    async fn get(&self, listing_id: &str, platform: Platform) -> Result<Option<ChannelListing>>;

    /// Reverse lookup by the platform-assigned identifier.
    async fn find_by_external_id(
        &self,
        platform: Platform,
        external_id: &str,
    ) -> Result<Option<ChannelListing>>;

    /// All channels of one listing, across platforms.
    async fn list_for_listing(&self, listing_id: &str) -> Result<Vec<ChannelListing>>;

    async fn set_status(
        &self,
        listing_id: &str,
        platform: Platform,
        status: ChannelStatus,
    ) -> Result<()>;
}
