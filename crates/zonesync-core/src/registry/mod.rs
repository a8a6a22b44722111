//! Plugin-based provider registry
//!
//! The registry allows DNS providers to be registered dynamically at
//! runtime, avoiding hardcoded if-else chains in the daemon.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zonesync_core::registry::ProviderRegistry;
//! use zonesync_core::config::{ProviderConfig, ReconcileConfig};
//!
//! let registry = ProviderRegistry::new();
//! zonesync_provider_azure::register(&registry);
//!
//! let config = ProviderConfig::Azure { ... };
//! let provider = registry.create_provider(&config, &ReconcileConfig::default())?;
//! ```

use crate::config::{ProviderConfig, ReconcileConfig};
use crate::error::{Error, Result};
use crate::traits::{Provider, ProviderFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Provider registry for plugin-based DNS provider creation
///
/// Maps provider type names to factory objects.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered DNS provider factories
    providers: RwLock<HashMap<String, Box<dyn ProviderFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS provider factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name (e.g., "azure")
    /// - `factory`: Factory object for creating provider instances
    pub fn register_provider(&self, name: impl Into<String>, factory: Box<dyn ProviderFactory>) {
        let mut providers = self.providers.write().unwrap_or_else(PoisonError::into_inner);
        providers.insert(name.into(), factory);
    }

    /// Create a DNS provider from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn Provider>)`: Created provider instance
    /// - `Err(Error)`: If the config is invalid, the provider type is not
    ///   registered, or creation fails
    pub fn create_provider(
        &self,
        config: &ProviderConfig,
        reconcile: &ReconcileConfig,
    ) -> Result<Box<dyn Provider>> {
        config.validate()?;

        let provider_type = config.type_name();
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);

        let factory = providers
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", provider_type)))?;

        factory.create(config, reconcile)
    }

    /// List all registered provider types
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        providers.keys().cloned().collect()
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        providers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProviderFactory;

    impl ProviderFactory for MockProviderFactory {
        fn create(
            &self,
            _config: &ProviderConfig,
            _reconcile: &ReconcileConfig,
        ) -> Result<Box<dyn Provider>> {
            Err(Error::not_found("Mock provider not implemented"))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ProviderRegistry::new();

        // Initially empty
        assert!(!registry.has_provider("mock"));

        registry.register_provider("mock", Box::new(MockProviderFactory));

        assert!(registry.has_provider("mock"));
        assert!(registry.list_providers().contains(&"mock".to_string()));
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let registry = ProviderRegistry::new();
        let config = ProviderConfig::Custom {
            factory: "nope".to_string(),
            config: serde_json::json!({}),
        };

        let result = registry.create_provider(&config, &ReconcileConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_factory_is_resolved_by_type_name() {
        let registry = ProviderRegistry::new();
        registry.register_provider("mock", Box::new(MockProviderFactory));

        let config = ProviderConfig::Custom {
            factory: "mock".to_string(),
            config: serde_json::json!({}),
        };

        let result = registry.create_provider(&config, &ReconcileConfig::default());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_invalid_config_rejected_before_factory() {
        let registry = ProviderRegistry::new();
        registry.register_provider("mock", Box::new(MockProviderFactory));

        let config = ProviderConfig::Custom {
            factory: "mock".to_string(),
            config: serde_json::Value::Null,
        };

        let result = registry.create_provider(&config, &ReconcileConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
