//! Append-only audit trail of publish, price-change, delist, and sold
//! events, keyed by listing. Used for observability and dispute
//! resolution; the store exposes no update or delete.

use {
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
};

use crosslist_common::Platform;

use crate::Result;

/// What happened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    Publish,
    PriceChange,
    Delist,
    Sold,
}

impl AuditEventType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::PriceChange => "price_change",
            Self::Delist => "delist",
            Self::Sold => "sold",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "publish" => Some(Self::Publish),
            "price_change" => Some(Self::PriceChange),
            "delist" => Some(Self::Delist),
            "sold" => Some(Self::Sold),
            _ => None,
        }
    }
}

/// A stored audit event. `id` is the insertion-ordered cursor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub id: i64,
    pub listing_id: String,
    /// Absent for listing-wide events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    pub event_type: AuditEventType,
    pub detail: String,
    pub payload: serde_json::Value,
    pub created_at: i64,
}

/// An event to append.
#[derive(Debug, Clone)]
pub struct NewAuditEvent {
    pub listing_id: String,
    pub platform: Option<Platform>,
    pub event_type: AuditEventType,
    pub detail: String,
    pub payload: serde_json::Value,
}

/// Filter and pagination for audit queries.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub listing_id: Option<String>,
    pub platform: Option<Platform>,
    pub event_type: Option<AuditEventType>,
    /// Return events with id strictly below this (keyset pagination,
    /// newest first).
    pub cursor: Option<i64>,
    /// Page size; clamped to [`AuditQuery::MAX_LIMIT`], 0 means default.
    pub limit: u32,
}

impl AuditQuery {
    pub const DEFAULT_LIMIT: u32 = 50;
    pub const MAX_LIMIT: u32 = 200;

    /// Effective page size after clamping.
    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        match self.limit {
            0 => Self::DEFAULT_LIMIT,
            n => n.min(Self::MAX_LIMIT),
        }
    }
}

/// One page of audit events, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditPage {
    pub events: Vec<AuditEvent>,
    /// Pass back as `cursor` to fetch the next (older) page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<i64>,
}

/// Append-only audit log.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, event: NewAuditEvent) -> Result<()>;
    async fn query(&self, query: AuditQuery) -> Result<AuditPage>;
}
