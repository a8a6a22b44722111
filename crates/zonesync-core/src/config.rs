//! Configuration types for the zonesync system
//!
//! This module defines all configuration structures used throughout the crate.
//! Configuration is loaded once at startup and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::zone::DomainFilter;

/// Default TTL for written record sets (in seconds)
pub const DEFAULT_RECORD_TTL: u32 = 300;

/// Settings shared by every reconciliation pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Only zones whose name ends with this value are considered
    #[serde(default)]
    pub domain_filter: String,

    /// Log intended mutations instead of calling the backend
    #[serde(default)]
    pub dry_run: bool,

    /// TTL applied to created and updated record sets
    #[serde(default = "default_record_ttl")]
    pub record_ttl: u32,
}

impl ReconcileConfig {
    /// Create settings for the given domain filter
    pub fn new(domain_filter: impl Into<String>) -> Self {
        Self {
            domain_filter: domain_filter.into(),
            ..Self::default()
        }
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the record TTL
    pub fn with_record_ttl(mut self, record_ttl: u32) -> Self {
        self.record_ttl = record_ttl;
        self
    }

    /// The domain filter as a matcher
    pub fn domain_filter(&self) -> DomainFilter {
        DomainFilter::new(self.domain_filter.clone())
    }

    /// Validate the reconciliation settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.record_ttl == 0 {
            return Err(crate::Error::config("Record TTL must be > 0"));
        }
        if self.domain_filter.chars().any(char::is_whitespace) {
            return Err(crate::Error::config(format!(
                "Domain filter contains whitespace: '{}'",
                self.domain_filter
            )));
        }
        Ok(())
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            domain_filter: String::new(),
            dry_run: false,
            record_ttl: default_record_ttl(),
        }
    }
}

fn default_record_ttl() -> u32 {
    DEFAULT_RECORD_TTL
}

/// DNS provider configuration
///
/// The Debug output never includes the access token.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Azure DNS provider
    Azure {
        /// Path to the Azure YAML config file
        config_file: String,
        /// Bearer token for the Azure Resource Manager API
        access_token: String,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Azure { config_file, .. } => f
                .debug_struct("Azure")
                .field("config_file", config_file)
                .field("access_token", &"<REDACTED>")
                .finish(),
            ProviderConfig::Custom { factory, config } => f
                .debug_struct("Custom")
                .field("factory", factory)
                .field("config", config)
                .finish(),
        }
    }
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Azure {
                config_file,
                access_token,
            } => {
                if config_file.is_empty() {
                    return Err(crate::Error::config("the Azure config file option is required"));
                }
                if access_token.is_empty() {
                    return Err(crate::Error::config("Azure access token cannot be empty"));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Azure { .. } => "azure",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}
