//! Facebook Marketplace adapter stub.

use {async_trait::async_trait, tracing::info};

use {
    crosslist_common::Platform, crosslist_config::PlatformCredentials, crosslist_listings::Listing,
};

use crate::{
    Result,
    adapter::{ChannelRef, PlatformAdapter, PublishReceipt},
    adapters::SimulatedApi,
};

pub struct FacebookAdapter {
    api: SimulatedApi,
}

impl FacebookAdapter {
    #[must_use]
    pub fn new(credentials: Option<&PlatformCredentials>, latency_ms: u64) -> Self {
        Self {
            api: SimulatedApi::new(Platform::Facebook, credentials, latency_ms),
        }
    }
}

#[async_trait]
impl PlatformAdapter for FacebookAdapter {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    fn name(&self) -> &str {
        "Facebook Marketplace"
    }

    async fn publish(&self, listing: &Listing) -> Result<PublishReceipt> {
        self.api.call().await?;
        let external_id = self.api.mint_external_id();
        info!(listing_id = %listing.id, %external_id, "created Marketplace listing");
        Ok(PublishReceipt {
            platform: Platform::Facebook,
            external_id,
        })
    }

    async fn unpublish(&self, target: &ChannelRef) -> Result<()> {
        self.api.call().await?;
        info!(external_id = %target.external_id, "removed Marketplace listing");
        Ok(())
    }

    async fn update_price(&self, target: &ChannelRef, new_price: f64) -> Result<()> {
        self.api.call().await?;
        info!(external_id = %target.external_id, new_price, "updated Marketplace price");
        Ok(())
    }
}
