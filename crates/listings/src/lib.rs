//! Listing model and persistence.
//!
//! The listing document is the canonical record for price and lifecycle
//! status. During the channel-registry migration window it may also carry a
//! legacy embedded `crossPostResults` map (platform name -> external id and
//! status); [`store::ListingStore`] exposes that path behind dedicated
//! methods so it can be deleted wholesale once migration completes.

pub mod error;
pub mod store;
pub mod store_sqlite;
pub mod types;

pub use {
    error::{Error, Result},
    store::ListingStore,
    store_sqlite::SqliteListingStore,
    types::{LegacyChannelRecord, Listing},
};
