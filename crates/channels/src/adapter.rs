//! Platform adapter capability trait.

use {async_trait::async_trait, crosslist_listings::Listing, serde::Serialize};

use crosslist_common::Platform;

use crate::Result;

/// Reference to a live platform listing, carrying the platform-assigned
/// external identifier.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChannelRef {
    pub platform: Platform,
    pub external_id: String,
}

impl ChannelRef {
    #[must_use]
    pub fn new(platform: Platform, external_id: impl Into<String>) -> Self {
        Self {
            platform,
            external_id: external_id.into(),
        }
    }
}

/// Result of a successful publish: the identifier the platform assigned.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReceipt {
    pub platform: Platform,
    pub external_id: String,
}

/// One marketplace's API surface. Thin wrapper over the platform's HTTP
/// API; the bundled implementations are stubs with simulated latency.
///
/// All three operations are idempotent from the subsystem's point of view:
/// unpublishing an already-ended listing or re-applying the current price
/// must succeed as a no-op. The reconciler cannot know whether a prior
/// attempt partially completed.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Which marketplace this adapter talks to.
    fn platform(&self) -> Platform;

    /// Human-readable marketplace name.
    fn name(&self) -> &str;

    /// Create the listing on the platform and return its external id.
    async fn publish(&self, listing: &Listing) -> Result<PublishReceipt>;

    /// End/remove the platform listing.
    async fn unpublish(&self, target: &ChannelRef) -> Result<()>;

    /// Update the live price on the platform.
    async fn update_price(&self, target: &ChannelRef, new_price: f64) -> Result<()>;
}
