//! Typed configuration schema.

use serde::{Deserialize, Serialize};

/// Top-level crosslist configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrosslistConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub queue: QueueConfig,
    pub registry: RegistryConfig,
    pub platforms: PlatformsConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind, `host:port`.
    pub bind: String,
    /// Shared secret for webhook signature verification. When unset,
    /// webhook signatures are not checked (development only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8188".into(),
            webhook_secret: None,
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://crosslist.db?mode=rwc".into(),
        }
    }
}

/// How publish work items are dispatched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueueMode {
    /// Append to the durable queue; a worker executes asynchronously.
    #[default]
    Durable,
    /// Execute synchronously in the calling request. For low-volume or
    /// development deployments where a queue is unjustified.
    Inline,
}

/// Publish queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueConfig {
    pub mode: QueueMode,
    /// Worker poll interval when the queue is idle, in milliseconds.
    pub poll_interval_ms: u64,
    /// Maximum publish jobs a single worker runs concurrently.
    pub concurrency: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            mode: QueueMode::Durable,
            poll_interval_ms: 500,
            concurrency: 1,
        }
    }
}

/// Which channel-registry backend publish results are written to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RegistryBackendChoice {
    /// Relational ChannelListing rows. The source of truth going forward.
    #[default]
    Canonical,
    /// The embedded `crossPostResults` map on the listing document.
    /// Migration-window compatibility only; writes here produce no
    /// audit events.
    Legacy,
}

/// Channel registry settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub backend: RegistryBackendChoice,
}

/// Credentials for one marketplace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformCredentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,
}

impl PlatformCredentials {
    /// Credentials are usable when at least an API key is present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Per-platform adapter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebay: Option<PlatformCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<PlatformCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poshmark: Option<PlatformCredentials>,
    /// Simulated API latency of the stub adapters, in milliseconds.
    pub simulate_latency_ms: u64,
    /// Timeout applied to each individual adapter call, in seconds.
    pub adapter_timeout_secs: u64,
}

impl Default for PlatformsConfig {
    fn default() -> Self {
        Self {
            ebay: None,
            facebook: None,
            poshmark: None,
            simulate_latency_ms: 150,
            adapter_timeout_secs: 30,
        }
    }
}

impl PlatformsConfig {
    /// Credentials for a platform by name, if configured.
    #[must_use]
    pub fn credentials(&self, platform: crosslist_common::Platform) -> Option<&PlatformCredentials> {
        use crosslist_common::Platform;
        match platform {
            Platform::Ebay => self.ebay.as_ref(),
            Platform::Facebook => self.facebook.as_ref(),
            Platform::Poshmark => self.poshmark.as_ref(),
        }
    }
}
