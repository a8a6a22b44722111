//! Change planning
//!
//! Computes the [`Changes`] batch that turns the current records into the
//! desired ones. Records are keyed by DNS name and record type, so one
//! name may hold an A and a TXT record at the same time.

use std::collections::{HashMap, HashSet};

use crate::endpoint::{Changes, Endpoint};

/// Current and desired state for one planning run
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Records currently held by the provider
    pub current: Vec<Endpoint>,
    /// Records that should exist
    pub desired: Vec<Endpoint>,
}

type Key = (String, String);

fn key(endpoint: &Endpoint) -> Key {
    (
        endpoint.dns_name.clone(),
        endpoint.effective_record_type().to_ascii_uppercase(),
    )
}

impl Plan {
    /// Create a plan
    pub fn new(current: Vec<Endpoint>, desired: Vec<Endpoint>) -> Self {
        Self { current, desired }
    }

    /// Compute the change batch
    ///
    /// Creates and updates follow the desired order, deletes follow the
    /// current order. When a key repeats, its first occurrence counts.
    pub fn calculate(&self) -> Changes {
        let mut current: HashMap<Key, &Endpoint> = HashMap::new();
        for endpoint in &self.current {
            current.entry(key(endpoint)).or_insert(endpoint);
        }

        let mut changes = Changes::new();
        let mut wanted: HashSet<Key> = HashSet::new();

        for endpoint in &self.desired {
            let k = key(endpoint);
            if !wanted.insert(k.clone()) {
                continue;
            }

            match current.get(&k) {
                None => changes.create.push(endpoint.clone()),
                Some(existing) if existing.target != endpoint.target => {
                    changes.update_old.push((*existing).clone());
                    changes.update_new.push(endpoint.clone());
                }
                Some(_) => {}
            }
        }

        let mut seen: HashSet<Key> = HashSet::new();
        for endpoint in &self.current {
            let k = key(endpoint);
            if !wanted.contains(&k) && seen.insert(k) {
                changes.delete.push(endpoint.clone());
            }
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_update_delete() {
        let current = vec![
            Endpoint::new("keep.example.com", "1.1.1.1", "A"),
            Endpoint::new("move.example.com", "2.2.2.2", "A"),
            Endpoint::new("gone.example.com", "3.3.3.3", "A"),
        ];
        let desired = vec![
            Endpoint::new("keep.example.com", "1.1.1.1", "A"),
            Endpoint::new("move.example.com", "4.4.4.4", "A"),
            Endpoint::new("new.example.com", "5.5.5.5", "A"),
        ];

        let changes = Plan::new(current, desired).calculate();

        assert_eq!(changes.create, vec![Endpoint::new("new.example.com", "5.5.5.5", "A")]);
        assert_eq!(changes.update_old, vec![Endpoint::new("move.example.com", "2.2.2.2", "A")]);
        assert_eq!(changes.update_new, vec![Endpoint::new("move.example.com", "4.4.4.4", "A")]);
        assert_eq!(changes.delete, vec![Endpoint::new("gone.example.com", "3.3.3.3", "A")]);
    }

    #[test]
    fn test_types_are_independent_and_blank_means_a() {
        let current = vec![
            Endpoint::new("www.example.com", "1.1.1.1", "A"),
            Endpoint::new("www.example.com", "owner=me", "TXT"),
        ];
        let desired = vec![
            Endpoint::new("www.example.com", "1.1.1.1", ""),
            Endpoint::new("www.example.com", "owner=me", "txt"),
        ];

        assert!(Plan::new(current, desired).calculate().is_empty());
    }

    #[test]
    fn test_empty_desired_deletes_everything() {
        let current = vec![
            Endpoint::new("a.example.com", "1.1.1.1", "A"),
            Endpoint::new("b.example.com", "alias.example.net", "CNAME"),
        ];

        let changes = Plan::new(current.clone(), Vec::new()).calculate();
        assert_eq!(changes.delete, current);
        assert!(changes.create.is_empty());
    }
}
