// # Azure DNS Provider
//
// This crate provides the Azure DNS backend for the zonesync system.
//
// ## Implementation Status
//
// - ✅ Zone listing scoped to one subscription and resource group
// - ✅ Record set listing with `nextLink` paging
// - ✅ One DELETE or PUT per record set change
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Specific error handling for HTTP status codes (401/403, 404, 409, 429, 5xx)
// - ✅ Dry-run mode (listing still hits the API, mutations are logged)
// - ✅ A, CNAME and TXT record sets
// - ❌ NO retry logic (the daemon runs the next pass instead)
// - ❌ NO token acquisition (the bearer token is supplied by the operator)
//
// ## Security Requirements
//
// - Access token and client secret NEVER appear in logs
// - Provider MUST fail fast if the token is empty
//
// ## API Reference
//
// - DNS zones: `Microsoft.Network/dnsZones`, api-version 2018-05-01
// - Record sets: `Microsoft.Network/dnsZones/{zone}/{type}/{name}`

mod client;
mod config;
mod wire;

pub use client::AzureDnsClient;
pub use config::{AzureCloud, AzureConfig};

use async_trait::async_trait;
use zonesync_core::config::{ProviderConfig, ReconcileConfig};
use zonesync_core::traits::{Provider, ProviderFactory, RecordsClient, ZonesClient};
use zonesync_core::{ApplyReport, Changes, Endpoint, Error, Reconciler, Result};

/// Azure DNS provider
///
/// Wraps a [`Reconciler`] over an [`AzureDnsClient`]. Both capabilities are
/// served by clones of the same client.
///
/// # Dry-Run Mode
///
/// When dry-run is enabled, the provider will:
/// - List zones and record sets as usual
/// - Log every intended DELETE and PUT
/// - **NOT** modify any record set
pub struct AzureProvider {
    /// Subscription and resource group, for Debug output only
    scope: String,

    /// Reconciliation engine over the Azure clients
    reconciler: Reconciler,
}

// Custom Debug implementation that hides the access token
impl std::fmt::Debug for AzureProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureProvider")
            .field("scope", &self.scope)
            .field("access_token", &"<REDACTED>")
            .field("dry_run", &self.reconciler.is_dry_run())
            .finish()
    }
}

impl AzureProvider {
    /// Create a new Azure provider
    ///
    /// # Parameters
    ///
    /// - `config`: Parsed Azure config file
    /// - `access_token`: Resource Manager bearer token
    /// - `reconcile`: Domain filter, dry-run and TTL settings
    ///
    /// # Security
    ///
    /// The access token will NEVER be logged or displayed in error messages.
    pub fn new(
        config: &AzureConfig,
        access_token: impl Into<String>,
        reconcile: &ReconcileConfig,
    ) -> Result<Self> {
        let client = AzureDnsClient::new(config, access_token)?;
        let scope = format!("{}/{}", config.subscription_id, config.resource_group);
        Self::from_clients(scope, Box::new(client.clone()), Box::new(client), reconcile)
    }

    /// Create a provider over arbitrary clients
    pub fn from_clients(
        scope: impl Into<String>,
        zones_client: Box<dyn ZonesClient>,
        records_client: Box<dyn RecordsClient>,
        reconcile: &ReconcileConfig,
    ) -> Result<Self> {
        Ok(Self {
            scope: scope.into(),
            reconciler: Reconciler::new(zones_client, records_client, reconcile)?,
        })
    }
}

#[async_trait]
impl Provider for AzureProvider {
    async fn records(&self) -> Result<Vec<Endpoint>> {
        self.reconciler.records().await
    }

    async fn apply_changes(&self, changes: &Changes) -> Result<ApplyReport> {
        self.reconciler.apply_changes(changes).await
    }

    fn provider_name(&self) -> &'static str {
        "azure"
    }
}

/// Factory for creating Azure providers
pub struct AzureFactory;

impl ProviderFactory for AzureFactory {
    fn create(
        &self,
        config: &ProviderConfig,
        reconcile: &ReconcileConfig,
    ) -> Result<Box<dyn Provider>> {
        match config {
            ProviderConfig::Azure {
                config_file,
                access_token,
            } => {
                if access_token.is_empty() {
                    return Err(Error::config("Azure access token is required"));
                }

                let azure = AzureConfig::load(config_file)?;

                if reconcile.dry_run {
                    tracing::warn!(
                        "Azure provider running in DRY-RUN mode - no changes will be made"
                    );
                }

                Ok(Box::new(AzureProvider::new(&azure, access_token.clone(), reconcile)?))
            }
            _ => Err(Error::config("Invalid config for Azure provider")),
        }
    }
}

/// Register the Azure provider with a registry
///
/// # Example
///
/// ```rust
/// use zonesync_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// zonesync_provider_azure::register(&registry);
/// assert!(registry.has_provider("azure"));
/// ```
pub fn register(registry: &zonesync_core::ProviderRegistry) {
    registry.register_provider("azure", Box::new(AzureFactory));
}
