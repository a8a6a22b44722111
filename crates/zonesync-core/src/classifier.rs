// # Change Classifier
//
// Splits a change batch into per-zone deletions and per-zone writes.
//
// ## Grouping
//
// - `delete` and `update_old` endpoints go to `deletions`
// - `create` and `update_new` endpoints go to `updates`
// - blank record types become "A"
// - endpoints owned by no zone are dropped and reported once per name
//
// ## Warning Deduplication
//
// The "already warned" memory is an explicit [`WarnedNames`] value owned by
// the caller. The reconciler creates a fresh one for every pass, so a
// name that stays unmanaged is reported again on the next pass.

use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashSet;

use tracing::info;

use crate::endpoint::{Changes, Endpoint};
use crate::zone::{Zone, ZoneDirectory};

/// Pending endpoints for one zone, in batch order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneChanges {
    /// Owning zone
    pub zone: Zone,
    /// Endpoints owned by the zone
    pub endpoints: Vec<Endpoint>,
}

/// Mapping from zone to its ordered endpoints
///
/// Keyed by zone name, so iteration visits zones in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneChangeMap {
    entries: BTreeMap<String, ZoneChanges>,
}

impl ZoneChangeMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an endpoint to the zone's sequence
    pub fn push(&mut self, zone: &Zone, endpoint: Endpoint) {
        self.entries
            .entry(zone.name.clone())
            .or_insert_with(|| ZoneChanges {
                zone: zone.clone(),
                endpoints: Vec::new(),
            })
            .endpoints
            .push(endpoint);
    }

    /// Endpoints queued for the named zone
    pub fn get(&self, zone_name: &str) -> Option<&[Endpoint]> {
        self.entries
            .get(zone_name)
            .map(|changes| changes.endpoints.as_slice())
    }

    /// Iterate zones and their endpoints
    pub fn iter(&self) -> btree_map::Values<'_, String, ZoneChanges> {
        self.entries.values()
    }

    /// Number of zones with pending endpoints
    pub fn zone_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of endpoints across all zones
    pub fn endpoint_count(&self) -> usize {
        self.entries.values().map(|c| c.endpoints.len()).sum()
    }

    /// Whether no zone has pending endpoints
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ZoneChangeMap {
    type Item = &'a ZoneChanges;
    type IntoIter = btree_map::Values<'a, String, ZoneChanges>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Names already reported as unmanaged
#[derive(Debug, Clone, Default)]
pub struct WarnedNames {
    names: HashSet<String>,
}

impl WarnedNames {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `dns_name`; returns `true` the first time a name is seen
    pub fn first_warning(&mut self, dns_name: &str) -> bool {
        if self.names.contains(dns_name) {
            return false;
        }
        self.names.insert(dns_name.to_string())
    }

    /// Number of distinct names reported
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing was reported yet
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Result of classifying one change batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Endpoints to delete, per zone
    pub deletions: ZoneChangeMap,
    /// Endpoints to create or update, per zone
    pub updates: ZoneChangeMap,
    /// Distinct unmanaged names dropped from the batch, first-seen order
    pub skipped: Vec<String>,
}

/// Classify `changes` against the zones in `directory`
pub fn classify(
    directory: &ZoneDirectory,
    changes: &Changes,
    warned: &mut WarnedNames,
) -> Classification {
    let mut classification = Classification::default();

    for endpoint in changes.removals() {
        route(
            directory,
            endpoint,
            &mut classification.deletions,
            &mut classification.skipped,
            warned,
        );
    }

    for endpoint in changes.writes() {
        route(
            directory,
            endpoint,
            &mut classification.updates,
            &mut classification.skipped,
            warned,
        );
    }

    classification
}

fn route(
    directory: &ZoneDirectory,
    endpoint: &Endpoint,
    target: &mut ZoneChangeMap,
    skipped: &mut Vec<String>,
    warned: &mut WarnedNames,
) {
    match directory.find_owning_zone(&endpoint.dns_name) {
        Some(zone) => target.push(zone, endpoint.with_default_type()),
        None => {
            if warned.first_warning(&endpoint.dns_name) {
                info!(
                    "Skipping record {} because no hosted zone matching record DNS Name was detected",
                    endpoint.dns_name
                );
                skipped.push(endpoint.dns_name.clone());
            }
        }
    }
}
