//! Publish orchestration and cross-platform synchronization.
//!
//! [`PublishDispatcher`] accepts `(listing, platform)` work: with a durable
//! queue configured it enqueues and a [`PublishWorker`] executes
//! asynchronously; without one it executes inline and returns the adapter
//! result to the caller. [`SyncReconciler`] ingests externally-reported
//! events (sold, price change) and propagates the consequences to every
//! other channel the listing is live on: best-effort fan-out, canonical
//! state first, audit trail always (canonical backend).

pub mod dispatcher;
pub mod error;
pub mod queue;
pub mod queue_sqlite;
pub mod reconciler;
pub mod types;
pub mod worker;

#[cfg(test)]
pub(crate) mod testutil;

pub use {
    dispatcher::PublishDispatcher,
    error::{Error, Result},
    queue::PublishQueue,
    queue_sqlite::SqlitePublishQueue,
    reconciler::SyncReconciler,
    types::{ClaimedJob, DispatchOutcome, PublishJob, PublishOutcome, SyncEventType, SyncOutcome},
    worker::PublishWorker,
};
