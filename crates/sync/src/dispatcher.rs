//! Dual-mode publish dispatch.

use std::{sync::Arc, time::Duration};

use tracing::{info, warn};

use {
    crosslist_channels::{
        AdapterRegistry, AuditEventType, AuditLog, ChannelListing, ChannelRef, ChannelStore,
        NewAuditEvent, PublishReceipt,
    },
    crosslist_common::{ChannelStatus, ListingStatus, Platform, now_ms},
    crosslist_config::RegistryBackendChoice,
    crosslist_listings::{LegacyChannelRecord, ListingStore},
};

use crate::{
    queue::PublishQueue,
    types::{DispatchOutcome, PublishJob, PublishOutcome},
};

/// Publish orchestrator. Explicitly constructed with its queue and stores,
/// one per deployment, injected where needed. No globals.
pub struct PublishDispatcher {
    queue: Option<Arc<dyn PublishQueue>>,
    listings: Arc<dyn ListingStore>,
    channels: Arc<dyn ChannelStore>,
    adapters: Arc<AdapterRegistry>,
    audit: Arc<dyn AuditLog>,
    backend: RegistryBackendChoice,
    adapter_timeout: Duration,
}

impl PublishDispatcher {
    pub fn new(
        queue: Option<Arc<dyn PublishQueue>>,
        listings: Arc<dyn ListingStore>,
        channels: Arc<dyn ChannelStore>,
        adapters: Arc<AdapterRegistry>,
        audit: Arc<dyn AuditLog>,
        backend: RegistryBackendChoice,
        adapter_timeout: Duration,
    ) -> Self {
        Self {
            queue,
            listings,
            channels,
            adapters,
            audit,
            backend,
            adapter_timeout,
        }
    }

    /// Dispatch a publish of `listing_id` to `platform_name`.
    ///
    /// Durable mode (queue configured): the item is appended and the call
    /// returns [`DispatchOutcome::Enqueued`] — acceptance, not completion.
    /// Inline mode: the adapter runs synchronously and its result is
    /// returned directly; the dispatcher records nothing in this mode, the
    /// caller owns the result.
    pub async fn dispatch_publish(&self, listing_id: &str, platform_name: &str) -> DispatchOutcome {
        let Some(platform) = Platform::parse(platform_name) else {
            return DispatchOutcome::Completed(PublishOutcome::failure(
                platform_name,
                "Unsupported platform",
            ));
        };

        let job = PublishJob {
            listing_id: listing_id.to_string(),
            platform,
        };

        match &self.queue {
            Some(queue) => match queue.enqueue(job).await {
                Ok(()) => {
                    info!(listing_id, platform = %platform, "publish enqueued");
                    DispatchOutcome::Enqueued
                },
                Err(e) => {
                    warn!(listing_id, platform = %platform, error = %e, "enqueue failed");
                    DispatchOutcome::Completed(PublishOutcome::failure(
                        platform.as_str(),
                        format!("enqueue failed: {e}"),
                    ))
                },
            },
            None => DispatchOutcome::Completed(self.execute_publish(&job).await),
        }
    }

    /// Run one publish against the platform adapter. No registry or audit
    /// writes; shared by the inline path and the worker, which records
    /// separately.
    pub(crate) async fn execute_publish(&self, job: &PublishJob) -> PublishOutcome {
        let platform = job.platform;
        let Some(adapter) = self.adapters.get(platform) else {
            return PublishOutcome::failure(platform.as_str(), "Unsupported platform");
        };

        let listing = match self.listings.get(&job.listing_id).await {
            Ok(Some(listing)) => listing,
            Ok(None) => {
                return PublishOutcome::failure(platform.as_str(), "Listing not found");
            },
            Err(e) => {
                return PublishOutcome::failure(platform.as_str(), format!("listing load: {e}"));
            },
        };

        let publish = tokio::time::timeout(self.adapter_timeout, adapter.publish(&listing));
        match publish.await {
            Ok(Ok(receipt)) => {
                info!(
                    listing_id = %job.listing_id,
                    platform = %platform,
                    external_id = %receipt.external_id,
                    "published"
                );
                PublishOutcome::success(platform, receipt.external_id)
            },
            Ok(Err(e)) => PublishOutcome::failure(platform.as_str(), e.to_string()),
            Err(_) => PublishOutcome::failure(platform.as_str(), "adapter timed out"),
        }
    }

    /// Worker path: publish, then record the result in the configured
    /// channel-registry backend and mark the listing active.
    pub(crate) async fn execute_and_record(&self, job: &PublishJob) -> PublishOutcome {
        let outcome = self.execute_publish(job).await;
        let Some(external_id) = outcome.external_id.clone() else {
            return outcome;
        };

        let receipt = PublishReceipt {
            platform: job.platform,
            external_id,
        };
        if let Err(e) = self.record_publish(job, &receipt).await {
            // The platform listing exists but our registry write failed;
            // surface as a failed attempt so the gap is visible.
            warn!(
                listing_id = %job.listing_id,
                platform = %job.platform,
                error = %e,
                "publish succeeded but recording failed"
            );
            return PublishOutcome::failure(
                job.platform.as_str(),
                format!("recording failed: {e}"),
            );
        }
        outcome
    }

    async fn record_publish(&self, job: &PublishJob, receipt: &PublishReceipt) -> crate::Result<()> {
        match self.backend {
            RegistryBackendChoice::Canonical => {
                self.channels
                    .upsert(ChannelListing {
                        listing_id: job.listing_id.clone(),
                        platform: job.platform,
                        external_id: receipt.external_id.clone(),
                        status: ChannelStatus::Active,
                        created_at: now_ms(),
                        updated_at: now_ms(),
                    })
                    .await?;
                self.audit
                    .record(NewAuditEvent {
                        listing_id: job.listing_id.clone(),
                        platform: Some(job.platform),
                        event_type: AuditEventType::Publish,
                        detail: format!("published to {}", job.platform),
                        payload: serde_json::json!({ "external_id": receipt.external_id }),
                    })
                    .await?;
            },
            // Migration-window compatibility: the embedded map is written
            // and no audit event is recorded.
            RegistryBackendChoice::Legacy => {
                self.listings
                    .set_legacy_channel(
                        &job.listing_id,
                        job.platform,
                        LegacyChannelRecord {
                            listing_id: receipt.external_id.clone(),
                            status: ChannelStatus::Active.as_str().into(),
                        },
                    )
                    .await?;
            },
        }

        self.listings
            .update_status(&job.listing_id, ListingStatus::Active)
            .await?;
        Ok(())
    }

    /// User-initiated removal of one channel: unpublish on the platform,
    /// end the channel record, write a `delist` audit event (canonical
    /// backend). Always runs inline.
    pub async fn delist(&self, listing_id: &str, platform_name: &str) -> PublishOutcome {
        let Some(platform) = Platform::parse(platform_name) else {
            return PublishOutcome::failure(platform_name, "Unsupported platform");
        };
        let Some(adapter) = self.adapters.get(platform) else {
            return PublishOutcome::failure(platform.as_str(), "Unsupported platform");
        };

        let external_id = match self.channel_external_id(listing_id, platform).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                return PublishOutcome::failure(
                    platform.as_str(),
                    "Listing has no channel on platform",
                );
            },
            Err(e) => return PublishOutcome::failure(platform.as_str(), e.to_string()),
        };

        let target = ChannelRef::new(platform, external_id.clone());
        let unpublish = tokio::time::timeout(self.adapter_timeout, adapter.unpublish(&target));
        match unpublish.await {
            Ok(Ok(())) => {},
            Ok(Err(e)) => return PublishOutcome::failure(platform.as_str(), e.to_string()),
            Err(_) => return PublishOutcome::failure(platform.as_str(), "adapter timed out"),
        }

        if let Err(e) = self.record_delist(listing_id, platform, &external_id).await {
            return PublishOutcome::failure(platform.as_str(), format!("recording failed: {e}"));
        }

        PublishOutcome::success(platform, external_id)
    }

    async fn channel_external_id(
        &self,
        listing_id: &str,
        platform: Platform,
    ) -> crate::Result<Option<String>> {
        if let Some(channel) = self.channels.get(listing_id, platform).await? {
            return Ok(Some(channel.external_id));
        }
        // Legacy fallback for pre-migration listings.
        let listing = self.listings.get(listing_id).await?;
        Ok(listing.and_then(|l| {
            l.cross_post_results
                .get(platform.as_str())
                .map(|r| r.listing_id.clone())
        }))
    }

    async fn record_delist(
        &self,
        listing_id: &str,
        platform: Platform,
        external_id: &str,
    ) -> crate::Result<()> {
        match self.channels.get(listing_id, platform).await? {
            Some(_) => {
                self.channels
                    .set_status(listing_id, platform, ChannelStatus::Ended)
                    .await?;
                self.audit
                    .record(NewAuditEvent {
                        listing_id: listing_id.to_string(),
                        platform: Some(platform),
                        event_type: AuditEventType::Delist,
                        detail: format!("delisted from {platform}"),
                        payload: serde_json::json!({ "external_id": external_id }),
                    })
                    .await?;
            },
            None => {
                self.listings
                    .set_legacy_channel(
                        listing_id,
                        platform,
                        LegacyChannelRecord {
                            listing_id: external_id.to_string(),
                            status: ChannelStatus::Ended.as_str().into(),
                        },
                    )
                    .await?;
            },
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestEnv;
    use crosslist_channels::{AuditQuery, ChannelStore as _};
    use crosslist_listings::{Listing, ListingStore as _};

    #[tokio::test]
    async fn unsupported_platform_is_structured_failure() {
        let env = TestEnv::new().await;
        let dispatcher = env.dispatcher(None);

        let outcome = dispatcher.dispatch_publish("l1", "etsy").await;
        let DispatchOutcome::Completed(outcome) = outcome else {
            panic!("expected completed outcome");
        };
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Unsupported platform"));
    }

    #[tokio::test]
    async fn inline_mode_returns_result_and_records_nothing() {
        let env = TestEnv::new().await;
        let dispatcher = env.dispatcher(None);

        let listing = Listing::new("u1", "Jacket", 25.0);
        env.listings.upsert(&listing).await.unwrap();

        let outcome = dispatcher.dispatch_publish(&listing.id, "ebay").await;
        let DispatchOutcome::Completed(outcome) = outcome else {
            panic!("expected completed outcome");
        };
        assert!(outcome.success, "error: {:?}", outcome.error);
        assert!(outcome.external_id.is_some());

        // Inline mode leaves recording to the caller.
        let channels = env.channels.list_for_listing(&listing.id).await.unwrap();
        assert!(channels.is_empty());
        let page = env.audit.query(AuditQuery::default()).await.unwrap();
        assert!(page.events.is_empty());
    }

    #[tokio::test]
    async fn inline_mode_missing_listing() {
        let env = TestEnv::new().await;
        let dispatcher = env.dispatcher(None);

        let outcome = dispatcher.dispatch_publish("ghost", "ebay").await;
        let DispatchOutcome::Completed(outcome) = outcome else {
            panic!("expected completed outcome");
        };
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Listing not found"));
    }

    #[tokio::test]
    async fn durable_mode_acknowledges_acceptance() {
        let env = TestEnv::new().await;
        let queue = env.queue();
        let dispatcher = env.dispatcher(Some(queue.clone()));

        let listing = Listing::new("u1", "Jacket", 25.0);
        env.listings.upsert(&listing).await.unwrap();

        let outcome = dispatcher.dispatch_publish(&listing.id, "facebook").await;
        assert!(matches!(outcome, DispatchOutcome::Enqueued));
        assert_eq!(queue.pending_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delist_ends_channel_and_audits() {
        let env = TestEnv::new().await;
        let dispatcher = env.dispatcher(None);

        let listing = Listing::new("u1", "Jacket", 25.0);
        env.listings.upsert(&listing).await.unwrap();
        env.seed_channel(&listing.id, Platform::Ebay, "ebay_1").await;

        let outcome = dispatcher.delist(&listing.id, "ebay").await;
        assert!(outcome.success, "error: {:?}", outcome.error);

        let channel = env
            .channels
            .get(&listing.id, Platform::Ebay)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(channel.status, ChannelStatus::Ended);

        let page = env
            .audit
            .query(AuditQuery {
                event_type: Some(AuditEventType::Delist),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.events.len(), 1);
    }

    #[tokio::test]
    async fn delist_without_channel_fails_as_data() {
        let env = TestEnv::new().await;
        let dispatcher = env.dispatcher(None);

        let listing = Listing::new("u1", "Jacket", 25.0);
        env.listings.upsert(&listing).await.unwrap();

        let outcome = dispatcher.delist(&listing.id, "ebay").await;
        assert!(!outcome.success);
    }
}
