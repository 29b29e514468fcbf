//! Work items and boundary result shapes.

use serde::{Deserialize, Serialize};

use crosslist_common::Platform;

/// The queue/worker contract: which listing goes to which platform. Both
/// sides of the queue boundary agree on exactly this shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishJob {
    pub listing_id: String,
    pub platform: Platform,
}

/// A job claimed from the durable queue.
#[derive(Debug, Clone)]
pub struct ClaimedJob {
    pub id: i64,
    pub job: PublishJob,
}

/// Externally-reported event kinds the reconciler acts on. Anything else
/// on the wire is a deliberate no-op (forward compatibility).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEventType {
    Sold,
    PriceChange,
}

impl SyncEventType {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "sold" => Some(Self::Sold),
            "price_change" => Some(Self::PriceChange),
            _ => None,
        }
    }
}

/// Per-platform publish/delist result, reported as data so a partially
/// successful cross-post stays visible per platform.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub success: bool,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PublishOutcome {
    #[must_use]
    pub fn success(platform: Platform, external_id: impl Into<String>) -> Self {
        Self {
            success: true,
            platform: platform.as_str().into(),
            external_id: Some(external_id.into()),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(platform: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            platform: platform.into(),
            external_id: None,
            error: Some(error.into()),
        }
    }
}

/// Result of a dispatch call: accepted onto the queue, or (inline mode)
/// the completed adapter result.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// The work item was accepted for asynchronous execution, not
    /// completed.
    Enqueued,
    Completed(PublishOutcome),
}

/// Result of one sync-event ingestion. `success` certifies the canonical
/// state change (and, canonical backend, the audit write). Downstream
/// channel consistency is eventual and not covered by it.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncOutcome {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    #[must_use]
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}
