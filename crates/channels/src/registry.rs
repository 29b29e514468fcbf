//! Adapter registry built at startup.

use std::{collections::HashMap, sync::Arc};

use crosslist_common::Platform;
use crosslist_config::PlatformsConfig;

use crate::{
    adapter::PlatformAdapter,
    adapters::{EbayAdapter, FacebookAdapter, PoshmarkAdapter},
};

/// Registry of all loaded platform adapters. Adding a marketplace means
/// registering an adapter here, nothing else.
pub struct AdapterRegistry {
    adapters: HashMap<Platform, Arc<dyn PlatformAdapter>>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Build the registry with the bundled adapters, configured from the
    /// `[platforms]` config section.
    #[must_use]
    pub fn from_config(config: &PlatformsConfig) -> Self {
        let latency = config.simulate_latency_ms;
        let mut registry = Self::new();
        registry.register(Arc::new(EbayAdapter::new(config.ebay.as_ref(), latency)));
        registry.register(Arc::new(FacebookAdapter::new(
            config.facebook.as_ref(),
            latency,
        )));
        registry.register(Arc::new(PoshmarkAdapter::new(
            config.poshmark.as_ref(),
            latency,
        )));
        registry
    }

    pub fn register(&mut self, adapter: Arc<dyn PlatformAdapter>) {
        self.adapters.insert(adapter.platform(), adapter);
    }

    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<Arc<dyn PlatformAdapter>> {
        self.adapters.get(&platform).cloned()
    }

    #[must_use]
    pub fn list(&self) -> Vec<Platform> {
        self.adapters.keys().copied().collect()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_registers_all_platforms() {
        let registry = AdapterRegistry::from_config(&PlatformsConfig::default());
        for p in Platform::ALL {
            assert!(registry.get(p).is_some(), "missing adapter for {p}");
        }
        assert_eq!(registry.list().len(), 3);
    }

    #[test]
    fn adapter_reports_its_platform() {
        let registry = AdapterRegistry::from_config(&PlatformsConfig::default());
        let adapter = registry.get(Platform::Ebay).unwrap();
        assert_eq!(adapter.platform(), Platform::Ebay);
        assert_eq!(adapter.name(), "eBay");
    }
}
