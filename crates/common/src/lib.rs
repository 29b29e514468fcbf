//! Shared domain vocabulary used across all crosslist crates.

pub mod types;

pub use types::{ChannelStatus, ListingStatus, Platform, now_ms};
