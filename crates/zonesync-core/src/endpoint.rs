//! Desired DNS records and change batches
//!
//! An [`Endpoint`] is produced by the planner and consumed read-only by the
//! classifier and reconciler. A [`Changes`] batch groups endpoints by the
//! mutation the planner wants applied.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Record type assumed when an endpoint leaves it blank
pub const DEFAULT_RECORD_TYPE: &str = "A";

/// DNS record types managed by zonesync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// Canonical name record
    Cname,
    /// Text record
    Txt,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Cname => "CNAME",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "CNAME" => Ok(RecordType::Cname),
            "TXT" => Ok(RecordType::Txt),
            _ => Err(Error::unsupported_record_type(s)),
        }
    }
}

/// A desired DNS record
///
/// The record type is kept as a string so that types outside
/// [`RecordType`] survive classification and fail per record at apply time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Fully qualified DNS name (e.g. "nginx.example.com")
    pub dns_name: String,
    /// Record value; meaning depends on the record type
    pub target: String,
    /// Record type; blank means [`DEFAULT_RECORD_TYPE`]
    #[serde(default)]
    pub record_type: String,
}

impl Endpoint {
    /// Create a new endpoint
    pub fn new(
        dns_name: impl Into<String>,
        target: impl Into<String>,
        record_type: impl Into<String>,
    ) -> Self {
        Self {
            dns_name: dns_name.into(),
            target: target.into(),
            record_type: record_type.into(),
        }
    }

    /// Record type with the blank default applied
    pub fn effective_record_type(&self) -> &str {
        if self.record_type.trim().is_empty() {
            DEFAULT_RECORD_TYPE
        } else {
            &self.record_type
        }
    }

    /// Parse the effective record type
    pub fn parsed_record_type(&self) -> Result<RecordType, Error> {
        self.effective_record_type().parse()
    }

    /// Copy of this endpoint with the blank record type replaced by the default
    pub fn with_default_type(&self) -> Self {
        Self {
            dns_name: self.dns_name.clone(),
            target: self.target.clone(),
            record_type: self.effective_record_type().to_string(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.dns_name,
            self.effective_record_type(),
            self.target
        )
    }
}

/// A batch of record mutations produced by the planner
///
/// Lists carry no ordering guarantee that the reconciler relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Changes {
    /// Records to create
    #[serde(default)]
    pub create: Vec<Endpoint>,
    /// Superseded values of updated records
    #[serde(default)]
    pub update_old: Vec<Endpoint>,
    /// New values of updated records
    #[serde(default)]
    pub update_new: Vec<Endpoint>,
    /// Records to delete
    #[serde(default)]
    pub delete: Vec<Endpoint>,
}

impl Changes {
    /// Create an empty change batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the batch contains no mutations at all
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update_old.is_empty()
            && self.update_new.is_empty()
            && self.delete.is_empty()
    }

    /// Endpoints whose current value must be removed (`delete` then `update_old`)
    pub fn removals(&self) -> impl Iterator<Item = &Endpoint> {
        self.delete.iter().chain(self.update_old.iter())
    }

    /// Endpoints whose value must be written (`create` then `update_new`)
    pub fn writes(&self) -> impl Iterator<Item = &Endpoint> {
        self.create.iter().chain(self.update_new.iter())
    }
}
