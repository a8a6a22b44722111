// # Records Client Trait
//
// Capability to read, delete and upsert record sets inside a zone.
//
// ## Record Shape
//
// Backends hand back [`RawRecord`] values in which every field is
// optional, mirroring cloud SDK objects where any level may be absent.
// [`RawRecord::to_endpoint`] performs the presence checks and yields an
// [`Endpoint`] only for complete A, CNAME and TXT records.
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::traits::RecordsClient;
// use zonesync_core::{RecordType, Zone};
//
// async fn pin(client: &dyn RecordsClient) -> zonesync_core::Result<()> {
//     let zone = Zone::new("example.com");
//     client.upsert_record(&zone, "www", RecordType::A, "1.2.3.4", 300).await?;
//     client.delete_record(&zone, "old", RecordType::Cname).await
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::endpoint::{Endpoint, RecordType};
use crate::names::to_fqdn;
use crate::zone::Zone;

/// A single IPv4 address entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ARecord {
    /// IPv4 address
    pub ipv4_address: Option<String>,
}

/// Canonical name entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnameRecord {
    /// Canonical target name
    pub cname: Option<String>,
}

/// A single text entry, possibly split into several strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxtRecord {
    /// Text chunks
    pub value: Option<Vec<String>>,
}

/// Record set payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSetProperties {
    /// Time-to-live in seconds
    pub ttl: Option<u32>,
    /// A entries
    pub a_records: Option<Vec<ARecord>>,
    /// CNAME entry
    pub cname_record: Option<CnameRecord>,
    /// TXT entries
    pub txt_records: Option<Vec<TxtRecord>>,
}

impl RecordSetProperties {
    /// Build the payload that sets `record_type` to the single `target` value
    pub fn for_target(record_type: RecordType, target: &str, ttl: u32) -> Self {
        let mut properties = Self {
            ttl: Some(ttl),
            ..Self::default()
        };

        match record_type {
            RecordType::A => {
                properties.a_records = Some(vec![ARecord {
                    ipv4_address: Some(target.to_string()),
                }]);
            }
            RecordType::Cname => {
                properties.cname_record = Some(CnameRecord {
                    cname: Some(target.to_string()),
                });
            }
            RecordType::Txt => {
                properties.txt_records = Some(vec![TxtRecord {
                    value: Some(vec![target.to_string()]),
                }]);
            }
        }

        properties
    }

    /// First value held for `record_type`, if any
    pub fn target(&self, record_type: RecordType) -> Option<&str> {
        match record_type {
            RecordType::A => self
                .a_records
                .as_ref()?
                .first()?
                .ipv4_address
                .as_deref(),
            RecordType::Cname => self.cname_record.as_ref()?.cname.as_deref(),
            RecordType::Txt => self
                .txt_records
                .as_ref()?
                .first()?
                .value
                .as_ref()?
                .first()
                .map(String::as_str),
        }
    }
}

/// A record set as listed by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Zone-relative name ("@" for the apex)
    pub name: Option<String>,
    /// Record type, plain ("A") or namespaced ("Microsoft.Network/dnszones/A")
    pub record_type: Option<String>,
    /// Record set payload
    pub properties: Option<RecordSetProperties>,
}

impl RawRecord {
    /// Record type with any provider namespace removed
    pub fn type_name(&self) -> Option<&str> {
        let raw = self.record_type.as_deref()?;
        raw.rsplit('/').next()
    }

    /// Convert into an endpoint under `zone_name`
    ///
    /// Returns `None` for unmanaged types (NS, SOA, MX, ...) and for
    /// records missing a name, type or value.
    pub fn to_endpoint(&self, zone_name: &str) -> Option<Endpoint> {
        let name = self.name.as_deref()?;
        let record_type: RecordType = self.type_name()?.parse().ok()?;
        let target = self.properties.as_ref()?.target(record_type)?;

        Some(Endpoint::new(
            to_fqdn(name, zone_name),
            target,
            record_type.as_str(),
        ))
    }
}

/// Backend capability: record set CRUD within a zone
///
/// # Trust Level: Untrusted
///
/// Implementations execute one logical operation per call and return the
/// outcome. Retry and backoff are not theirs to decide; a failed record is
/// attempted again on the next reconciliation pass.
#[async_trait]
pub trait RecordsClient: Send + Sync {
    /// List every record set in `zone`, across all pages
    async fn list_records(&self, zone: &Zone) -> Result<Vec<RawRecord>, crate::Error>;

    /// Delete the record set `(relative_name, record_type)` in `zone`
    async fn delete_record(
        &self,
        zone: &Zone,
        relative_name: &str,
        record_type: RecordType,
    ) -> Result<(), crate::Error>;

    /// Create or replace the record set `(relative_name, record_type)` in
    /// `zone` so that it holds exactly `value`
    async fn upsert_record(
        &self,
        zone: &Zone,
        relative_name: &str,
        record_type: RecordType,
        value: &str,
        ttl: u32,
    ) -> Result<(), crate::Error>;
}
