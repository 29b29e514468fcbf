//! Event intake and cross-platform propagation.

use std::{sync::Arc, time::Duration};

use tracing::{debug, info, warn};

use {
    crosslist_channels::{
        AdapterRegistry, AuditEventType, AuditLog, ChannelRef, ChannelResolver, ChannelStore,
        NewAuditEvent, RegistryBackend,
    },
    crosslist_common::{ChannelStatus, ListingStatus, Platform},
    crosslist_listings::{LegacyChannelRecord, Listing, ListingStore},
};

use crate::types::{SyncEventType, SyncOutcome};

/// One sibling channel a compensating action fans out to.
struct FanOutTarget {
    platform: Platform,
    external_id: String,
}

/// Applies an externally-reported event to canonical state and propagates
/// the consequences to every other channel of the same listing.
///
/// Compensating-saga semantics: the canonical mutation (and its audit
/// record) is what `success` certifies; downstream adapter calls are
/// attempted independently, failures logged, never surfaced as a subsystem
/// failure, and never rolled back.
pub struct SyncReconciler {
    listings: Arc<dyn ListingStore>,
    channels: Arc<dyn ChannelStore>,
    adapters: Arc<AdapterRegistry>,
    audit: Arc<dyn AuditLog>,
    resolver: ChannelResolver,
    adapter_timeout: Duration,
}

impl SyncReconciler {
    pub fn new(
        listings: Arc<dyn ListingStore>,
        channels: Arc<dyn ChannelStore>,
        adapters: Arc<AdapterRegistry>,
        audit: Arc<dyn AuditLog>,
        adapter_timeout: Duration,
    ) -> Self {
        let resolver = ChannelResolver::new(channels.clone(), listings.clone());
        Self {
            listings,
            channels,
            adapters,
            audit,
            resolver,
            adapter_timeout,
        }
    }

    /// Ingest one platform event. Resolution misses and unsupported
    /// platforms come back as structured failures; they are normal
    /// outcomes (stale webhooks exist) and must not raise.
    pub async fn handle_sync_event(
        &self,
        source_platform: &str,
        external_id: &str,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> SyncOutcome {
        let Some(source) = Platform::parse(source_platform) else {
            return SyncOutcome::fail("Unsupported platform");
        };

        let resolved = match self
            .resolver
            .find_listing_by_platform_listing_id(source, external_id)
            .await
        {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(platform = %source, external_id, error = %e, "lookup failed");
                return SyncOutcome::fail("lookup failed");
            },
        };
        let Some(resolved) = resolved else {
            return SyncOutcome::fail("Listing not found for platform id");
        };

        let Some(event) = SyncEventType::parse(event_type) else {
            // Reserved for forward compatibility.
            debug!(event_type, "ignoring unhandled sync event type");
            return SyncOutcome::ok();
        };

        info!(
            platform = %source,
            external_id,
            event_type,
            listing_id = %resolved.listing.id,
            backend = ?resolved.backend,
            "applying sync event"
        );

        match event {
            SyncEventType::Sold => {
                self.apply_sold(source, &resolved.listing, resolved.backend, payload)
                    .await
            },
            SyncEventType::PriceChange => {
                self.apply_price_change(source, &resolved.listing, resolved.backend, payload)
                    .await
            },
        }
    }

    async fn apply_sold(
        &self,
        source: Platform,
        listing: &Listing,
        backend: RegistryBackend,
        payload: &serde_json::Value,
    ) -> SyncOutcome {
        // Canonical mutation happens-before everything else.
        if let Err(e) = self
            .listings
            .update_status(&listing.id, ListingStatus::Sold)
            .await
        {
            warn!(listing_id = %listing.id, error = %e, "failed to mark listing sold");
            return SyncOutcome::fail("failed to apply event");
        }

        if backend == RegistryBackend::Canonical {
            let recorded = self
                .audit
                .record(NewAuditEvent {
                    listing_id: listing.id.clone(),
                    platform: Some(source),
                    event_type: AuditEventType::Sold,
                    detail: format!("sold on {source}"),
                    payload: payload.clone(),
                })
                .await;
            if let Err(e) = recorded {
                warn!(listing_id = %listing.id, error = %e, "audit write failed");
                return SyncOutcome::fail("audit write failed");
            }
        }

        for target in self.fan_out_targets(listing, backend, source).await {
            let target_ref = ChannelRef::new(target.platform, target.external_id.clone());
            match self.call_unpublish(&target_ref).await {
                Ok(()) => {
                    self.mark_channel_ended(listing, backend, &target).await;
                },
                Err(e) => {
                    warn!(
                        listing_id = %listing.id,
                        platform = %target.platform,
                        error = %e,
                        "unpublish failed, continuing fan-out"
                    );
                },
            }
        }

        SyncOutcome::ok()
    }

    async fn apply_price_change(
        &self,
        source: Platform,
        listing: &Listing,
        backend: RegistryBackend,
        payload: &serde_json::Value,
    ) -> SyncOutcome {
        let new_price = payload
            .get("new_price")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(listing.price);

        if let Err(e) = self.listings.update_price(&listing.id, new_price).await {
            warn!(listing_id = %listing.id, error = %e, "failed to update price");
            return SyncOutcome::fail("failed to apply event");
        }

        if backend == RegistryBackend::Canonical {
            let recorded = self
                .audit
                .record(NewAuditEvent {
                    listing_id: listing.id.clone(),
                    platform: Some(source),
                    event_type: AuditEventType::PriceChange,
                    detail: format!("price changed on {source}"),
                    payload: serde_json::json!({ "new_price": new_price }),
                })
                .await;
            if let Err(e) = recorded {
                warn!(listing_id = %listing.id, error = %e, "audit write failed");
                return SyncOutcome::fail("audit write failed");
            }
        }

        for target in self.fan_out_targets(listing, backend, source).await {
            let target_ref = ChannelRef::new(target.platform, target.external_id.clone());
            if let Err(e) = self.call_update_price(&target_ref, new_price).await {
                warn!(
                    listing_id = %listing.id,
                    platform = %target.platform,
                    error = %e,
                    "price propagation failed, continuing fan-out"
                );
            }
        }

        SyncOutcome::ok()
    }

    /// Every channel of the listing on a platform other than the source.
    async fn fan_out_targets(
        &self,
        listing: &Listing,
        backend: RegistryBackend,
        source: Platform,
    ) -> Vec<FanOutTarget> {
        match backend {
            RegistryBackend::Canonical => match self.channels.list_for_listing(&listing.id).await {
                Ok(rows) => rows
                    .into_iter()
                    .filter(|c| c.platform != source)
                    .map(|c| FanOutTarget {
                        platform: c.platform,
                        external_id: c.external_id,
                    })
                    .collect(),
                Err(e) => {
                    warn!(listing_id = %listing.id, error = %e, "failed to list channels");
                    Vec::new()
                },
            },
            RegistryBackend::Legacy => listing
                .cross_post_results
                .iter()
                .filter_map(|(name, record)| {
                    Platform::parse(name).map(|platform| FanOutTarget {
                        platform,
                        external_id: record.listing_id.clone(),
                    })
                })
                .filter(|t| t.platform != source)
                .collect(),
        }
    }

    async fn mark_channel_ended(
        &self,
        listing: &Listing,
        backend: RegistryBackend,
        target: &FanOutTarget,
    ) {
        let result = match backend {
            RegistryBackend::Canonical => {
                self.channels
                    .set_status(&listing.id, target.platform, ChannelStatus::Ended)
                    .await
            },
            RegistryBackend::Legacy => self
                .listings
                .set_legacy_channel(
                    &listing.id,
                    target.platform,
                    LegacyChannelRecord {
                        listing_id: target.external_id.clone(),
                        status: ChannelStatus::Ended.as_str().into(),
                    },
                )
                .await
                .map_err(Into::into),
        };
        if let Err(e) = result {
            warn!(
                listing_id = %listing.id,
                platform = %target.platform,
                error = %e,
                "channel ended on platform but status write failed"
            );
        }
    }

    async fn call_unpublish(&self, target: &ChannelRef) -> crosslist_channels::Result<()> {
        let Some(adapter) = self.adapters.get(target.platform) else {
            return Err(crosslist_channels::Error::unsupported_platform(
                target.platform.as_str(),
            ));
        };
        match tokio::time::timeout(self.adapter_timeout, adapter.unpublish(target)).await {
            Ok(result) => result,
            Err(_) => Err(crosslist_channels::Error::timeout(target.platform.as_str())),
        }
    }

    async fn call_update_price(
        &self,
        target: &ChannelRef,
        new_price: f64,
    ) -> crosslist_channels::Result<()> {
        let Some(adapter) = self.adapters.get(target.platform) else {
            return Err(crosslist_channels::Error::unsupported_platform(
                target.platform.as_str(),
            ));
        };
        match tokio::time::timeout(self.adapter_timeout, adapter.update_price(target, new_price))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(crosslist_channels::Error::timeout(target.platform.as_str())),
        }
    }
}
