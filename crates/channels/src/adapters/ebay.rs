//! eBay adapter stub.
//!
//! The real integration goes through the eBay Sell Inventory API; this stub
//! keeps the same call shape (create item, end item, revise price).

use {async_trait::async_trait, tracing::info};

use {
    crosslist_common::Platform, crosslist_config::PlatformCredentials, crosslist_listings::Listing,
};

use crate::{
    Result,
    adapter::{ChannelRef, PlatformAdapter, PublishReceipt},
    adapters::SimulatedApi,
};

pub struct EbayAdapter {
    api: SimulatedApi,
}

impl EbayAdapter {
    #[must_use]
    pub fn new(credentials: Option<&PlatformCredentials>, latency_ms: u64) -> Self {
        Self {
            api: SimulatedApi::new(Platform::Ebay, credentials, latency_ms),
        }
    }
}

#[async_trait]
impl PlatformAdapter for EbayAdapter {
    fn platform(&self) -> Platform {
        Platform::Ebay
    }

    fn name(&self) -> &str {
        "eBay"
    }

    async fn publish(&self, listing: &Listing) -> Result<PublishReceipt> {
        self.api.call().await?;
        let external_id = self.api.mint_external_id();
        info!(listing_id = %listing.id, %external_id, "created eBay item");
        Ok(PublishReceipt {
            platform: Platform::Ebay,
            external_id,
        })
    }

    async fn unpublish(&self, target: &ChannelRef) -> Result<()> {
        self.api.call().await?;
        // Ending an already-ended item is accepted by eBay; mirror that.
        info!(external_id = %target.external_id, "ended eBay item");
        Ok(())
    }

    async fn update_price(&self, target: &ChannelRef, new_price: f64) -> Result<()> {
        self.api.call().await?;
        info!(external_id = %target.external_id, new_price, "revised eBay price");
        Ok(())
    }
}
