//! Test doubles and common utilities for reconciliation contract tests
//!
//! The fakes keep their state behind `Arc`s, so a clone handed to the
//! reconciler shares call logs with the clone kept by the test.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use zonesync_core::error::{Error, Result};
use zonesync_core::traits::{RawRecord, RecordSetProperties, RecordsClient, ZonesClient};
use zonesync_core::{ReconcileConfig, Reconciler, RecordType, Zone};

/// A zones client returning a fixed zone list
#[derive(Clone)]
pub struct FakeZonesClient {
    zones: Vec<Zone>,
    fail: bool,
    list_call_count: Arc<AtomicUsize>,
}

impl FakeZonesClient {
    pub fn new(names: &[&str]) -> Self {
        Self {
            zones: names.iter().map(|name| Zone::new(*name)).collect(),
            fail: false,
            list_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A client whose listing always fails
    pub fn failing() -> Self {
        Self {
            zones: Vec::new(),
            fail: true,
            list_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ZonesClient for FakeZonesClient {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::http("zones endpoint unavailable"));
        }
        Ok(self.zones.clone())
    }
}

/// A backend call observed by [`FakeRecordsClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Delete {
        zone: String,
        name: String,
        record_type: RecordType,
    },
    Upsert {
        zone: String,
        name: String,
        record_type: RecordType,
        value: String,
        ttl: u32,
    },
}

impl Call {
    pub fn delete(zone: &str, name: &str, record_type: RecordType) -> Self {
        Call::Delete {
            zone: zone.to_string(),
            name: name.to_string(),
            record_type,
        }
    }

    pub fn upsert(zone: &str, name: &str, record_type: RecordType, value: &str, ttl: u32) -> Self {
        Call::Upsert {
            zone: zone.to_string(),
            name: name.to_string(),
            record_type,
            value: value.to_string(),
            ttl,
        }
    }
}

/// A records client that logs calls and fails on demand
#[derive(Clone, Default)]
pub struct FakeRecordsClient {
    records: Arc<HashMap<String, Vec<RawRecord>>>,
    failing: Arc<HashSet<(String, String)>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeRecordsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` when `zone` is listed
    pub fn with_records(mut self, zone: &str, records: Vec<RawRecord>) -> Self {
        let mut map = (*self.records).clone();
        map.insert(zone.to_string(), records);
        self.records = Arc::new(map);
        self
    }

    /// Fail every mutation of `name` in `zone`
    pub fn failing_on(mut self, zone: &str, name: &str) -> Self {
        let mut set = (*self.failing).clone();
        set.insert((zone.to_string(), name.to_string()));
        self.failing = Arc::new(set);
        self
    }

    /// Backend calls in the order they were made
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self, zone: &Zone, name: &str) -> Result<()> {
        if self.failing.contains(&(zone.name.clone(), name.to_string())) {
            return Err(Error::backend(format!("injected failure for {name}")));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordsClient for FakeRecordsClient {
    async fn list_records(&self, zone: &Zone) -> Result<Vec<RawRecord>> {
        Ok(self.records.get(&zone.name).cloned().unwrap_or_default())
    }

    async fn delete_record(
        &self,
        zone: &Zone,
        relative_name: &str,
        record_type: RecordType,
    ) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::delete(&zone.name, relative_name, record_type));
        self.check(zone, relative_name)
    }

    async fn upsert_record(
        &self,
        zone: &Zone,
        relative_name: &str,
        record_type: RecordType,
        value: &str,
        ttl: u32,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(Call::upsert(
            &zone.name,
            relative_name,
            record_type,
            value,
            ttl,
        ));
        self.check(zone, relative_name)
    }
}

/// Build a listed record set the way Azure reports it
pub fn azure_record(name: &str, record_type: &str, value: &str) -> RawRecord {
    let properties = match record_type.parse::<RecordType>() {
        Ok(parsed) => RecordSetProperties::for_target(parsed, value, 300),
        Err(_) => RecordSetProperties::default(),
    };

    RawRecord {
        name: Some(name.to_string()),
        record_type: Some(format!("Microsoft.Network/dnszones/{record_type}")),
        properties: Some(properties),
    }
}

/// Reconciler over the given fakes with the given settings
pub fn reconciler(
    zones: &FakeZonesClient,
    records: &FakeRecordsClient,
    config: ReconcileConfig,
) -> Reconciler {
    Reconciler::new(Box::new(zones.clone()), Box::new(records.clone()), &config)
        .expect("reconciler construction succeeds")
}
