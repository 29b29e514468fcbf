//! Channel registry, platform adapters, and the audit log.
//!
//! Each marketplace (eBay, Facebook, Poshmark) implements the
//! [`PlatformAdapter`] trait; adapters are held in an [`AdapterRegistry`]
//! built at startup, so adding a platform means registering an adapter.
//! [`resolver::ChannelResolver`] maps a platform-assigned external id back
//! to the owning listing, consulting the canonical ChannelListing rows
//! first and the legacy embedded map second.

pub mod adapter;
pub mod adapters;
pub mod audit;
pub mod audit_sqlite;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod store_sqlite;

pub use {
    adapter::{ChannelRef, PlatformAdapter, PublishReceipt},
    audit::{AuditEvent, AuditEventType, AuditLog, AuditPage, AuditQuery, NewAuditEvent},
    audit_sqlite::SqliteAuditLog,
    error::{Error, Result},
    registry::AdapterRegistry,
    resolver::{ChannelResolver, RegistryBackend, ResolvedListing},
    store::{ChannelListing, ChannelStore},
    store_sqlite::SqliteChannelStore,
};
