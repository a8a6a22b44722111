//! Azure Resource Manager JSON shapes for DNS zones and record sets

use serde::{Deserialize, Serialize};
use zonesync_core::traits::{ARecord, CnameRecord, RawRecord, RecordSetProperties, TxtRecord};
use zonesync_core::Zone;

/// A page of a list operation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListPage<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    pub next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ZoneResource {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl ZoneResource {
    pub fn into_zone(self) -> Option<Zone> {
        let zone = Zone::new(self.name?);
        Some(match self.id {
            Some(id) => zone.with_id(id),
            None => zone,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordSetResource {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub properties: Option<RecordSetPropertiesWire>,
}

impl From<RecordSetResource> for RawRecord {
    fn from(resource: RecordSetResource) -> Self {
        RawRecord {
            name: resource.name,
            record_type: resource.record_type,
            properties: resource.properties.map(RecordSetProperties::from),
        }
    }
}

/// Body of a record set PUT
#[derive(Debug, Serialize)]
pub(crate) struct RecordSetBody {
    pub properties: RecordSetPropertiesWire,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct RecordSetPropertiesWire {
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(rename = "ARecords", skip_serializing_if = "Option::is_none")]
    pub a_records: Option<Vec<ARecordWire>>,
    #[serde(rename = "CNAMERecord", skip_serializing_if = "Option::is_none")]
    pub cname_record: Option<CnameRecordWire>,
    #[serde(rename = "TXTRecords", skip_serializing_if = "Option::is_none")]
    pub txt_records: Option<Vec<TxtRecordWire>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ARecordWire {
    #[serde(rename = "ipv4Address")]
    pub ipv4_address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CnameRecordWire {
    pub cname: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TxtRecordWire {
    pub value: Option<Vec<String>>,
}

impl From<RecordSetPropertiesWire> for RecordSetProperties {
    fn from(wire: RecordSetPropertiesWire) -> Self {
        RecordSetProperties {
            ttl: wire.ttl,
            a_records: wire.a_records.map(|records| {
                records
                    .into_iter()
                    .map(|r| ARecord {
                        ipv4_address: r.ipv4_address,
                    })
                    .collect()
            }),
            cname_record: wire.cname_record.map(|r| CnameRecord { cname: r.cname }),
            txt_records: wire.txt_records.map(|records| {
                records
                    .into_iter()
                    .map(|r| TxtRecord { value: r.value })
                    .collect()
            }),
        }
    }
}

impl From<RecordSetProperties> for RecordSetPropertiesWire {
    fn from(properties: RecordSetProperties) -> Self {
        RecordSetPropertiesWire {
            ttl: properties.ttl,
            a_records: properties.a_records.map(|records| {
                records
                    .into_iter()
                    .map(|r| ARecordWire {
                        ipv4_address: r.ipv4_address,
                    })
                    .collect()
            }),
            cname_record: properties
                .cname_record
                .map(|r| CnameRecordWire { cname: r.cname }),
            txt_records: properties.txt_records.map(|records| {
                records
                    .into_iter()
                    .map(|r| TxtRecordWire { value: r.value })
                    .collect()
            }),
        }
    }
}
