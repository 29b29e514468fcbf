//! Dual-backend lookup: external id -> owning listing.
//!
//! The canonical ChannelListing rows are consulted first; listings that
//! predate the relational registry are found through their legacy embedded
//! `crossPostResults` map. The fallback chain is a documented strategy, not
//! per-call branching: canonical priority, then legacy scan order, first
//! match wins (external ids are platform-assigned and unique per platform).

use std::sync::Arc;

use {serde::Serialize, tracing::warn};

use {crosslist_common::Platform, crosslist_listings::Listing, crosslist_listings::ListingStore};

use crate::{Result, store::ChannelStore};

/// Which backend resolved a lookup.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistryBackend {
    Canonical,
    Legacy,
}

/// A resolved lookup: the owning listing and the backend that knew it.
#[derive(Debug, Clone)]
pub struct ResolvedListing {
    pub listing: Listing,
    pub backend: RegistryBackend,
}

/// Maps `(platform, external_id)` back to the owning listing.
pub struct ChannelResolver {
    channels: Arc<dyn ChannelStore>,
    listings: Arc<dyn ListingStore>,
}

impl ChannelResolver {
    pub fn new(channels: Arc<dyn ChannelStore>, listings: Arc<dyn ListingStore>) -> Self {
        Self { channels, listings }
    }

    /// Resolve a platform-assigned external id to its listing.
    ///
    /// Returns `Ok(None)` when neither backend knows the id — callers treat
    /// that as "unknown listing, do not apply event". A canonical-store
    /// error is logged and treated as a miss so the legacy fallback still
    /// runs (e.g. a deployment where the rows are not yet migrated).
    pub async fn find_listing_by_platform_listing_id(
        &self,
        platform: Platform,
        external_id: &str,
    ) -> Result<Option<ResolvedListing>> {
        match self.channels.find_by_external_id(platform, external_id).await {
            Ok(Some(channel)) => {
                if let Some(listing) = self.listings.get(&channel.listing_id).await? {
                    return Ok(Some(ResolvedListing {
                        listing,
                        backend: RegistryBackend::Canonical,
                    }));
                }
                // Dangling row: fall through to the legacy scan.
                warn!(
                    %platform,
                    external_id,
                    listing_id = %channel.listing_id,
                    "channel row references a missing listing"
                );
            },
            Ok(None) => {},
            Err(e) => {
                warn!(%platform, external_id, error = %e, "canonical lookup failed, trying legacy");
            },
        }

        let legacy = self
            .listings
            .find_by_legacy_external_id(platform, external_id)
            .await?;

        Ok(legacy.map(|listing| ResolvedListing {
            listing,
            backend: RegistryBackend::Legacy,
        }))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use {
        crosslist_common::{ChannelStatus, now_ms},
        crosslist_listings::{LegacyChannelRecord, SqliteListingStore},
        sqlx::SqlitePool,
    };

    use crate::store::ChannelListing;
    use crate::store_sqlite::SqliteChannelStore;

    async fn make_resolver() -> (
        ChannelResolver,
        Arc<SqliteChannelStore>,
        Arc<SqliteListingStore>,
    ) {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        SqliteChannelStore::init(&pool).await.unwrap();
        SqliteListingStore::init(&pool).await.unwrap();
        let channels = Arc::new(SqliteChannelStore::new(pool.clone()));
        let listings = Arc::new(SqliteListingStore::new(pool));
        let resolver = ChannelResolver::new(channels.clone(), listings.clone());
        (resolver, channels, listings)
    }

    #[tokio::test]
    async fn canonical_row_wins() {
        let (resolver, channels, listings) = make_resolver().await;

        let listing = Listing::new("u1", "Jacket", 25.0);
        listings.upsert(&listing).await.unwrap();
        channels
            .upsert(ChannelListing {
                listing_id: listing.id.clone(),
                platform: Platform::Ebay,
                external_id: "ebay_1".into(),
                status: ChannelStatus::Active,
                created_at: now_ms(),
                updated_at: now_ms(),
            })
            .await
            .unwrap();

        let resolved = resolver
            .find_listing_by_platform_listing_id(Platform::Ebay, "ebay_1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.listing.id, listing.id);
        assert_eq!(resolved.backend, RegistryBackend::Canonical);
    }

    #[tokio::test]
    async fn falls_back_to_legacy_map() {
        let (resolver, _channels, listings) = make_resolver().await;

        let mut listing = Listing::new("u1", "Jacket", 25.0);
        listing.cross_post_results.insert(
            "facebook".into(),
            LegacyChannelRecord {
                listing_id: "fb_9".into(),
                status: "active".into(),
            },
        );
        listings.upsert(&listing).await.unwrap();

        let resolved = resolver
            .find_listing_by_platform_listing_id(Platform::Facebook, "fb_9")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.listing.id, listing.id);
        assert_eq!(resolved.backend, RegistryBackend::Legacy);
    }

    #[tokio::test]
    async fn unknown_id_resolves_to_none() {
        let (resolver, _channels, _listings) = make_resolver().await;
        let resolved = resolver
            .find_listing_by_platform_listing_id(Platform::Ebay, "not-a-real-id")
            .await
            .unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn canonical_beats_legacy_when_both_match() {
        let (resolver, channels, listings) = make_resolver().await;

        // Listing A holds the id in a canonical row, listing B in its
        // legacy map. Canonical priority must pick A.
        let a = Listing::new("u1", "A", 1.0);
        listings.upsert(&a).await.unwrap();
        channels
            .upsert(ChannelListing {
                listing_id: a.id.clone(),
                platform: Platform::Poshmark,
                external_id: "posh_1".into(),
                status: ChannelStatus::Active,
                created_at: now_ms(),
                updated_at: now_ms(),
            })
            .await
            .unwrap();

        let mut b = Listing::new("u1", "B", 2.0);
        b.cross_post_results.insert(
            "poshmark".into(),
            LegacyChannelRecord {
                listing_id: "posh_1".into(),
                status: "active".into(),
            },
        );
        listings.upsert(&b).await.unwrap();

        let resolved = resolver
            .find_listing_by_platform_listing_id(Platform::Poshmark, "posh_1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.listing.id, a.id);
        assert_eq!(resolved.backend, RegistryBackend::Canonical);
    }
}
