//! Configuration loading and env substitution.
//!
//! Config files: `crosslist.toml`, `crosslist.yaml`, or `crosslist.json`
//! Searched in `./` then `~/.config/crosslist/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, load_config},
    schema::{
        CrosslistConfig, DatabaseConfig, PlatformCredentials, PlatformsConfig, QueueConfig,
        QueueMode, RegistryBackendChoice, RegistryConfig, ServerConfig,
    },
};
