//! Persistence trait for listings.

use async_trait::async_trait;

use crosslist_common::{ListingStatus, Platform};

use crate::{
    Result,
    types::{LegacyChannelRecord, Listing},
};

/// Persistence backend for listing documents.
///
/// The legacy methods (`set_legacy_channel`, `find_by_legacy_external_id`)
/// exist only for the embedded-map compatibility path and are the sole code
/// touching `crossPostResults`.
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Listing>>;

    /// Insert or replace the full listing document.
    async fn upsert(&self, listing: &Listing) -> Result<()>;

    /// Set the lifecycle status. Errors with [`crate::Error::NotFound`] if
    /// the listing does not exist.
    async fn update_status(&self, id: &str, status: ListingStatus) -> Result<()>;

    /// Set the canonical price. Errors with [`crate::Error::NotFound`] if
    /// the listing does not exist.
    async fn update_price(&self, id: &str, price: f64) -> Result<()>;

    /// Write one entry of the legacy embedded channel map.
    async fn set_legacy_channel(
        &self,
        id: &str,
        platform: Platform,
        record: LegacyChannelRecord,
    ) -> Result<()>;

    /// Scan listings whose embedded map holds the given external id for the
    /// given platform. First match wins (scan order).
    async fn find_by_legacy_external_id(
        &self,
        platform: Platform,
        external_id: &str,
    ) -> Result<Option<Listing>>;
}
