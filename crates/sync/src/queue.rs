//! Durable publish queue trait.

use async_trait::async_trait;

use crate::{
    Result,
    types::{ClaimedJob, PublishJob},
};

/// Durable queue of publish work items.
///
/// At-least-once: a claimed job that is neither completed nor failed (e.g.
/// worker crash) stays claimed; recovery of stuck claims is an operational
/// concern outside this trait. The claim operation must be atomic so
/// multiple workers can run against one queue.
#[async_trait]
pub trait PublishQueue: Send + Sync {
    /// Append a work item. Returning `Ok` means accepted, not completed.
    async fn enqueue(&self, job: PublishJob) -> Result<()>;

    /// Atomically take the oldest pending item, if any.
    async fn claim(&self) -> Result<Option<ClaimedJob>>;

    /// Mark a claimed item done.
    async fn complete(&self, id: i64) -> Result<()>;

    /// Mark a claimed item failed with a terminal error. This layer does
    /// not retry; adapters own idempotent retries internally.
    async fn fail(&self, id: i64, error: &str) -> Result<()>;

    /// Number of items waiting to be claimed.
    async fn pending_count(&self) -> Result<u64>;
}
