// # Zone Directory
//
// Holds the authoritative zones visible to one reconciliation pass and
// answers "which zone owns this record name?".
//
// ## Matching Rule
//
// A zone owns a name when the name ends with the zone name. The check is a
// raw string suffix, not a label-boundary match, so "notexample.com" is
// owned by "example.com". Among several owners the longest zone name wins;
// equal lengths resolve to the zone seen first.

use serde::{Deserialize, Serialize};

/// An authoritative DNS zone managed by the backend
///
/// Zones are read-only snapshots fetched once per pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone {
    /// DNS suffix of the zone (e.g. "example.com")
    pub name: String,
    /// Opaque provider handle (resource ID, zone ID, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Zone {
    /// Create a zone without a provider handle
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    /// Attach the provider handle
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Whether this zone's name is a suffix of `dns_name`
    pub fn matches(&self, dns_name: &str) -> bool {
        dns_name.ends_with(self.name.as_str())
    }
}

/// Find the zone owning `dns_name`
///
/// Pure function of its inputs; the result does not depend on the order
/// of `zones` except between zones of identical name length.
pub fn find_owning_zone<'a>(zones: &'a [Zone], dns_name: &str) -> Option<&'a Zone> {
    let mut owner: Option<&Zone> = None;

    for zone in zones.iter().filter(|zone| zone.matches(dns_name)) {
        match owner {
            Some(current) if current.name.len() >= zone.name.len() => {}
            _ => owner = Some(zone),
        }
    }

    owner
}

/// Restricts which zones a pass considers
///
/// An empty filter accepts every zone. Otherwise a zone is accepted when
/// its name ends with the filter value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainFilter(String);

impl DomainFilter {
    /// Create a filter for the given domain
    pub fn new(domain: impl Into<String>) -> Self {
        Self(domain.into())
    }

    /// A filter that accepts every zone
    pub fn any() -> Self {
        Self::default()
    }

    /// The filter value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the filter accepts the zone name
    pub fn matches(&self, zone_name: &str) -> bool {
        self.0.is_empty() || zone_name.ends_with(self.0.as_str())
    }
}

/// Immutable snapshot of the zones visible to one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneDirectory {
    zones: Vec<Zone>,
}

impl ZoneDirectory {
    /// Wrap a zone snapshot
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    /// Build a directory keeping only zones accepted by `filter`
    pub fn filtered(zones: impl IntoIterator<Item = Zone>, filter: &DomainFilter) -> Self {
        Self {
            zones: zones
                .into_iter()
                .filter(|zone| filter.matches(&zone.name))
                .collect(),
        }
    }

    /// Longest-suffix lookup, see [`find_owning_zone`]
    pub fn find_owning_zone(&self, dns_name: &str) -> Option<&Zone> {
        find_owning_zone(&self.zones, dns_name)
    }

    /// All zones in the snapshot
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Number of zones
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether the snapshot holds no zones
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl FromIterator<Zone> for ZoneDirectory {
    fn from_iter<I: IntoIterator<Item = Zone>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zones(names: &[&str]) -> Vec<Zone> {
        names.iter().map(|name| Zone::new(*name)).collect()
    }

    #[test]
    fn test_most_specific_zone_wins() {
        let forward = zones(&["example.com", "nginx.example.com"]);
        let reverse = zones(&["nginx.example.com", "example.com"]);

        for set in [&forward, &reverse] {
            let owner = find_owning_zone(set, "nginx.example.com").unwrap();
            assert_eq!(owner.name, "nginx.example.com");

            let owner = find_owning_zone(set, "www.nginx.example.com").unwrap();
            assert_eq!(owner.name, "nginx.example.com");

            let owner = find_owning_zone(set, "www.example.com").unwrap();
            assert_eq!(owner.name, "example.com");
        }
    }

    #[test]
    fn test_no_match() {
        let set = zones(&["example.com"]);
        assert!(find_owning_zone(&set, "example.org").is_none());
        assert!(find_owning_zone(&[], "example.com").is_none());
    }

    #[test]
    fn test_raw_suffix_match_crosses_label_boundary() {
        let set = zones(&["example.com"]);
        let owner = find_owning_zone(&set, "notexample.com").unwrap();
        assert_eq!(owner.name, "example.com");
    }

    #[test]
    fn test_equal_length_tie_keeps_first_seen() {
        let set = vec![
            Zone::new("example.com").with_id("first"),
            Zone::new("example.com").with_id("second"),
        ];
        let owner = find_owning_zone(&set, "a.example.com").unwrap();
        assert_eq!(owner.id.as_deref(), Some("first"));
    }

    #[test]
    fn test_domain_filter() {
        assert!(DomainFilter::any().matches("anything.org"));

        let filter = DomainFilter::new("example.com");
        assert!(filter.matches("example.com"));
        assert!(filter.matches("sub.example.com"));
        assert!(!filter.matches("example.org"));

        let directory = ZoneDirectory::filtered(
            zones(&["example.com", "example.org", "dev.example.com"]),
            &filter,
        );
        let names: Vec<_> = directory.zones().iter().map(|z| z.name.as_str()).collect();
        assert_eq!(names, vec!["example.com", "dev.example.com"]);
    }
}
