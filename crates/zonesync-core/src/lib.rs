// # zonesync-core
//
// Core library for reconciling desired DNS records against a cloud DNS
// zone provider.
//
// ## Architecture Overview
//
// - **ZoneDirectory**: Zone snapshot with longest-suffix ownership lookup
// - **names**: Fully qualified <-> zone-relative record names
// - **classify**: Per-zone grouping of deletions and writes
// - **Reconciler**: Fetch zones, classify, delete, then upsert
// - **Plan**: Current vs. desired records into a change batch
// - **ZonesClient / RecordsClient**: Backend capabilities
// - **ProviderRegistry**: Plugin-based registry for providers
//
// ## Design Principles
//
// 1. **Pure core**: Matching, naming and classification have no I/O
// 2. **Substitutable backends**: Zone listing and record CRUD are
//    separate traits, so the reconciler runs against fakes in tests
// 3. **Delete before write**: Superseded values go first
// 4. **Partial failure**: One failed record never stops a batch

pub mod traits;
pub mod engine;
pub mod registry;
pub mod config;
pub mod error;
pub mod endpoint;
pub mod zone;
pub mod names;
pub mod classifier;
pub mod plan;

// Re-export core types for convenience
pub use traits::{Provider, ProviderFactory, RecordsClient, ZonesClient};
pub use engine::{ApplyReport, Operation, RecordError, Reconciler};
pub use registry::ProviderRegistry;
pub use config::{ProviderConfig, ReconcileConfig};
pub use error::{Error, Result};
pub use endpoint::{Changes, Endpoint, RecordType};
pub use zone::{DomainFilter, Zone, ZoneDirectory, find_owning_zone};
pub use names::{APEX, to_fqdn, to_zone_relative_name};
pub use classifier::{Classification, WarnedNames, ZoneChangeMap, classify};
pub use plan::Plan;
