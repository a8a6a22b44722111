// # Zones Client Trait
//
// Capability to enumerate the zones a backend hosts.
//
// ## Implementations
//
// - Azure DNS: `zonesync-provider-azure` crate
// - Tests: in-memory fakes under `tests/common`

use async_trait::async_trait;

use crate::zone::Zone;

/// Backend capability: list hosted zones
///
/// Pagination is the implementation's concern; callers receive the full
/// list or an error.
#[async_trait]
pub trait ZonesClient: Send + Sync {
    /// List every zone visible to the configured credentials
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Zone>)`: All zones, across every page
    /// - `Err(Error)`: If enumeration failed; the reconciler treats this as
    ///   fatal for the pass
    async fn list_zones(&self) -> Result<Vec<Zone>, crate::Error>;
}
