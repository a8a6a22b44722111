// # Provider Trait
//
// The surface a concrete DNS provider exposes to the daemon: list the
// current records and apply a change batch. Most implementations wrap a
// [`Reconciler`](crate::Reconciler) over their own zones and records
// clients.

use async_trait::async_trait;

use crate::endpoint::{Changes, Endpoint};
use crate::engine::ApplyReport;

/// A DNS provider that can be reconciled
#[async_trait]
pub trait Provider: Send + Sync {
    /// Current records of every managed zone, as endpoints
    async fn records(&self) -> Result<Vec<Endpoint>, crate::Error>;

    /// Apply a change batch
    ///
    /// # Returns
    ///
    /// - `Ok(ApplyReport)`: The batch was processed to completion; inspect
    ///   the report for per-record failures
    /// - `Err(Error)`: The pass could not start (e.g. zone fetch failed)
    async fn apply_changes(&self, changes: &Changes) -> Result<ApplyReport, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing providers from configuration
pub trait ProviderFactory: Send + Sync {
    /// Create a Provider instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Provider configuration
    /// - `reconcile`: Shared reconciliation settings (domain filter, dry-run)
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
        reconcile: &crate::config::ReconcileConfig,
    ) -> Result<Box<dyn Provider>, crate::Error>;
}
