//! Core traits for the zonesync system
//!
//! This module defines the abstract interfaces that all backends must follow.
//!
//! - [`ZonesClient`]: Enumerate hosted zones
//! - [`RecordsClient`]: List, delete and upsert record sets
//! - [`Provider`]: Records listing and change application for the daemon

pub mod zones_client;
pub mod records_client;
pub mod provider;

pub use zones_client::ZonesClient;
pub use records_client::{
    ARecord, CnameRecord, RawRecord, RecordSetProperties, RecordsClient, TxtRecord,
};
pub use provider::{Provider, ProviderFactory};
