//! Desired-state file loading
//!
//! The desired file is a JSON array of endpoints:
//!
//! ```json
//! [
//!   {"dnsName": "www.example.com", "target": "10.0.0.1", "recordType": "A"},
//!   {"dnsName": "example.com", "target": "owner=me", "recordType": "TXT"}
//! ]
//! ```
//!
//! `recordType` may be omitted, in which case the record is treated as A.
//! The file is re-read on every pass.

use anyhow::{Context, Result};
use std::path::Path;
use zonesync_core::Endpoint;

/// Read the desired endpoints from `path`
pub fn load(path: &Path) -> Result<Vec<Endpoint>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read desired file '{}'", path.display()))?;

    parse(&contents).with_context(|| format!("malformed desired file '{}'", path.display()))
}

fn parse(contents: &str) -> Result<Vec<Endpoint>> {
    let endpoints: Vec<Endpoint> = serde_json::from_str(contents)?;

    if let Some(blank) = endpoints.iter().position(|e| e.dns_name.is_empty()) {
        anyhow::bail!("entry {} has an empty dnsName", blank);
    }

    Ok(endpoints)
}
