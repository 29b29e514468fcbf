//! HTTP boundary: publish/delist endpoints, platform webhook intake, and
//! the audit query API.

pub mod audit_routes;
pub mod listing_routes;
pub mod server;
pub mod state;
pub mod webhook_routes;

pub use {
    server::{build_app, serve},
    state::AppState,
};
