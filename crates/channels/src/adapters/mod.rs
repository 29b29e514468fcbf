//! Bundled marketplace adapters.
//!
//! All three are stubs over the real platform APIs: they check that
//! credentials are configured, sleep for a configurable simulated latency,
//! and mint a synthetic external id on publish. The trait surface and the
//! registry wiring are what the rest of the system depends on; swapping a
//! stub for a real HTTP client changes nothing outside its file.

pub mod ebay;
pub mod facebook;
pub mod poshmark;

pub use {ebay::EbayAdapter, facebook::FacebookAdapter, poshmark::PoshmarkAdapter};

use std::time::Duration;

use crosslist_common::Platform;
use crosslist_config::PlatformCredentials;

use crate::{Error, Result};

/// Shared simulation core: credential gate plus jittered latency.
pub(crate) struct SimulatedApi {
    platform: Platform,
    latency: Duration,
    configured: bool,
}

impl SimulatedApi {
    pub(crate) fn new(
        platform: Platform,
        credentials: Option<&PlatformCredentials>,
        latency_ms: u64,
    ) -> Self {
        Self {
            platform,
            latency: Duration::from_millis(latency_ms),
            configured: credentials.is_some_and(PlatformCredentials::is_configured),
        }
    }

    /// Simulate one platform API round trip.
    pub(crate) async fn call(&self) -> Result<()> {
        if !self.configured {
            return Err(Error::missing_credentials(self.platform.as_str()));
        }
        if !self.latency.is_zero() {
            let jitter: f64 = rand::random_range(0.5..1.5);
            tokio::time::sleep(self.latency.mul_f64(jitter)).await;
        }
        Ok(())
    }

    /// Mint a synthetic platform-assigned identifier.
    pub(crate) fn mint_external_id(&self) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("{}_{}", self.platform.as_str(), &suffix[..12])
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{ChannelRef, PlatformAdapter};

    fn creds() -> PlatformCredentials {
        PlatformCredentials {
            api_key: Some("k".into()),
            api_secret: None,
        }
    }

    fn listing() -> crosslist_listings::Listing {
        crosslist_listings::Listing::new("u1", "Test item", 10.0)
    }

    #[tokio::test]
    async fn publish_returns_prefixed_external_id() {
        let adapter = EbayAdapter::new(Some(&creds()), 0);
        let receipt = adapter.publish(&listing()).await.unwrap();
        assert_eq!(receipt.platform, Platform::Ebay);
        assert!(receipt.external_id.starts_with("ebay_"));
    }

    #[tokio::test]
    async fn missing_credentials_fail_as_data() {
        let adapter = FacebookAdapter::new(None, 0);
        let err = adapter.publish(&listing()).await.expect_err("no creds");
        assert!(matches!(err, Error::MissingCredentials { .. }));
    }

    #[tokio::test]
    async fn unpublish_is_idempotent() {
        let adapter = PoshmarkAdapter::new(Some(&creds()), 0);
        let target = ChannelRef::new(Platform::Poshmark, "posh_1");
        adapter.unpublish(&target).await.unwrap();
        // Second call on the same (already ended) listing must also succeed.
        adapter.unpublish(&target).await.unwrap();
    }

    #[tokio::test]
    async fn update_price_succeeds() {
        let adapter = EbayAdapter::new(Some(&creds()), 0);
        let target = ChannelRef::new(Platform::Ebay, "ebay_1");
        adapter.update_price(&target, 20.0).await.unwrap();
    }
}
