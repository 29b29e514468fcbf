//! Shared fixtures for dispatcher, worker, and reconciler tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use {
    async_trait::async_trait,
    sqlx::sqlite::{SqlitePool, SqlitePoolOptions},
};

use {
    crosslist_channels::{
        AdapterRegistry, ChannelListing, ChannelRef, PlatformAdapter, PublishReceipt,
        SqliteAuditLog, SqliteChannelStore,
        store::ChannelStore as _,
    },
    crosslist_common::{ChannelStatus, Platform, now_ms},
    crosslist_config::RegistryBackendChoice,
    crosslist_listings::{Listing, SqliteListingStore},
};

use crate::{
    dispatcher::PublishDispatcher, queue::PublishQueue, queue_sqlite::SqlitePublishQueue,
    reconciler::SyncReconciler,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AdapterCall {
    Publish { listing_id: String },
    Unpublish { external_id: String },
    UpdatePrice { external_id: String, new_price: f64 },
}

/// Test double that records every call and can be flipped into a failing
/// state to exercise partial fan-out.
pub(crate) struct RecordingAdapter {
    platform: Platform,
    fail: AtomicBool,
    counter: AtomicU64,
    calls: Mutex<Vec<AdapterCall>>,
}

impl RecordingAdapter {
    pub(crate) fn new(platform: Platform) -> Self {
        Self {
            platform,
            fail: AtomicBool::new(false),
            counter: AtomicU64::new(1),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> Vec<AdapterCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: AdapterCall) -> crosslist_channels::Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail.load(Ordering::SeqCst) {
            return Err(crosslist_channels::Error::adapter(
                self.platform.as_str(),
                "simulated outage",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PlatformAdapter for RecordingAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn name(&self) -> &str {
        self.platform.as_str()
    }

    async fn publish(&self, listing: &Listing) -> crosslist_channels::Result<PublishReceipt> {
        self.record(AdapterCall::Publish {
            listing_id: listing.id.clone(),
        })?;
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(PublishReceipt {
            platform: self.platform,
            external_id: format!("{}_{n}", self.platform),
        })
    }

    async fn unpublish(&self, target: &ChannelRef) -> crosslist_channels::Result<()> {
        self.record(AdapterCall::Unpublish {
            external_id: target.external_id.clone(),
        })
    }

    async fn update_price(
        &self,
        target: &ChannelRef,
        new_price: f64,
    ) -> crosslist_channels::Result<()> {
        self.record(AdapterCall::UpdatePrice {
            external_id: target.external_id.clone(),
            new_price,
        })
    }
}

pub(crate) struct TestEnv {
    pub pool: SqlitePool,
    pub listings: Arc<SqliteListingStore>,
    pub channels: Arc<SqliteChannelStore>,
    pub audit: Arc<SqliteAuditLog>,
    pub adapters: Arc<AdapterRegistry>,
    pub ebay: Arc<RecordingAdapter>,
    pub facebook: Arc<RecordingAdapter>,
    pub poshmark: Arc<RecordingAdapter>,
}

impl TestEnv {
    pub(crate) async fn new() -> Self {
        // One connection: every handle sees the same in-memory database,
        // including tasks spawned by the worker.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SqliteListingStore::init(&pool).await.unwrap();
        SqliteChannelStore::init(&pool).await.unwrap();
        SqliteAuditLog::init(&pool).await.unwrap();
        SqlitePublishQueue::init(&pool).await.unwrap();

        let ebay = Arc::new(RecordingAdapter::new(Platform::Ebay));
        let facebook = Arc::new(RecordingAdapter::new(Platform::Facebook));
        let poshmark = Arc::new(RecordingAdapter::new(Platform::Poshmark));
        let mut adapters = AdapterRegistry::new();
        adapters.register(ebay.clone());
        adapters.register(facebook.clone());
        adapters.register(poshmark.clone());

        Self {
            listings: Arc::new(SqliteListingStore::new(pool.clone())),
            channels: Arc::new(SqliteChannelStore::new(pool.clone())),
            audit: Arc::new(SqliteAuditLog::new(pool.clone())),
            adapters: Arc::new(adapters),
            ebay,
            facebook,
            poshmark,
            pool,
        }
    }

    pub(crate) fn queue(&self) -> Arc<SqlitePublishQueue> {
        Arc::new(SqlitePublishQueue::new(self.pool.clone()))
    }

    pub(crate) fn dispatcher(
        &self,
        queue: Option<Arc<dyn PublishQueue>>,
    ) -> Arc<PublishDispatcher> {
        self.dispatcher_with_backend(queue, RegistryBackendChoice::Canonical)
    }

    pub(crate) fn dispatcher_with_backend(
        &self,
        queue: Option<Arc<dyn PublishQueue>>,
        backend: RegistryBackendChoice,
    ) -> Arc<PublishDispatcher> {
        Arc::new(PublishDispatcher::new(
            queue,
            self.listings.clone(),
            self.channels.clone(),
            self.adapters.clone(),
            self.audit.clone(),
            backend,
            Duration::from_secs(5),
        ))
    }

    pub(crate) fn reconciler(&self) -> SyncReconciler {
        SyncReconciler::new(
            self.listings.clone(),
            self.channels.clone(),
            self.adapters.clone(),
            self.audit.clone(),
            Duration::from_secs(5),
        )
    }

    pub(crate) async fn seed_channel(
        &self,
        listing_id: &str,
        platform: Platform,
        external_id: &str,
    ) {
        self.channels
            .upsert(ChannelListing {
                listing_id: listing_id.into(),
                platform,
                external_id: external_id.into(),
                status: ChannelStatus::Active,
                created_at: now_ms(),
                updated_at: now_ms(),
            })
            .await
            .unwrap();
    }
}
