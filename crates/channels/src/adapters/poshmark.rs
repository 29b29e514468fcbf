//! Poshmark adapter stub.
//!
//! Poshmark has no public listing API; the production integration drives a
//! headless browser session. The stub stands in for that whole mechanism.

use {async_trait::async_trait, tracing::info};

use {
    crosslist_common::Platform, crosslist_config::PlatformCredentials, crosslist_listings::Listing,
};

use crate::{
    Result,
    adapter::{ChannelRef, PlatformAdapter, PublishReceipt},
    adapters::SimulatedApi,
};

pub struct PoshmarkAdapter {
    api: SimulatedApi,
}

impl PoshmarkAdapter {
    #[must_use]
    pub fn new(credentials: Option<&PlatformCredentials>, latency_ms: u64) -> Self {
        Self {
            api: SimulatedApi::new(Platform::Poshmark, credentials, latency_ms),
        }
    }
}

#[async_trait]
impl PlatformAdapter for PoshmarkAdapter {
    fn platform(&self) -> Platform {
        Platform::Poshmark
    }

    fn name(&self) -> &str {
        "Poshmark"
    }

    async fn publish(&self, listing: &Listing) -> Result<PublishReceipt> {
        self.api.call().await?;
        let external_id = self.api.mint_external_id();
        info!(listing_id = %listing.id, %external_id, "created Poshmark listing");
        Ok(PublishReceipt {
            platform: Platform::Poshmark,
            external_id,
        })
    }

    async fn unpublish(&self, target: &ChannelRef) -> Result<()> {
        self.api.call().await?;
        info!(external_id = %target.external_id, "marked Poshmark listing not for sale");
        Ok(())
    }

    async fn update_price(&self, target: &ChannelRef, new_price: f64) -> Result<()> {
        self.api.call().await?;
        info!(external_id = %target.external_id, new_price, "dropped Poshmark price");
        Ok(())
    }
}
