//! Reconciler
//!
//! The Reconciler is responsible for:
//! - Fetching the zones visible through the domain filter
//! - Classifying a change batch per owning zone
//! - Deleting superseded records before writing new ones
//! - Collecting per-record failures without aborting the batch
//!
//! ## Architecture
//!
//! ```text
//!                 ┌─────────────┐
//!   Changes ─────▶│ Reconciler  │
//!                 └─────────────┘
//!                        │
//!       ┌────────────────┼─────────────────┐
//!       │                │                 │
//!       ▼                ▼                 ▼
//! ┌─────────────┐  ┌─────────────┐  ┌───────────────┐
//! │ ZonesClient │  │ classify()  │  │ RecordsClient │
//! │ (list)      │  │ (per zone)  │  │ (delete/put)  │
//! └─────────────┘  └─────────────┘  └───────────────┘
//! ```
//!
//! ## Pass Flow
//!
//! 1. List zones, keep those accepted by the domain filter
//! 2. Classify changes into deletions and updates
//! 3. Apply every deletion
//! 4. Apply every create/update through the same upsert path
//! 5. Return an [`ApplyReport`]
//!
//! Calls are issued one at a time; nothing here spawns tasks.

use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, error, info};

use crate::classifier::{classify, WarnedNames};
use crate::config::ReconcileConfig;
use crate::endpoint::{Changes, Endpoint};
use crate::error::{Error, Result};
use crate::names::to_zone_relative_name;
use crate::traits::{RecordsClient, ZonesClient};
use crate::zone::{DomainFilter, Zone, ZoneDirectory};

/// Mutation attempted against the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Record set deletion
    Delete,
    /// Record set create-or-update
    Upsert,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Delete => f.write_str("delete"),
            Operation::Upsert => f.write_str("upsert"),
        }
    }
}

/// A record whose desired state was not reached this pass
#[derive(Debug)]
pub struct RecordError {
    /// Owning zone name
    pub zone: String,
    /// Zone-relative record name
    pub record_name: String,
    /// Record type of the endpoint, "A" when it was left blank
    pub record_type: String,
    /// Attempted mutation
    pub operation: Operation,
    /// Underlying failure
    pub error: Error,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} record '{}' in zone '{}': {}",
            self.operation, self.record_type, self.record_name, self.zone, self.error
        )
    }
}

/// Outcome of one reconciliation pass
#[derive(Debug)]
pub struct ApplyReport {
    /// When the pass started
    pub started_at: DateTime<Utc>,
    /// When the pass finished
    pub finished_at: DateTime<Utc>,
    /// Whether mutations were only logged
    pub dry_run: bool,
    /// Deletions performed (or intended, in dry-run)
    pub deleted: usize,
    /// Upserts performed (or intended, in dry-run)
    pub upserted: usize,
    /// Distinct names dropped because no zone owns them
    pub skipped: Vec<String>,
    /// Per-record failures
    pub errors: Vec<RecordError>,
}

impl ApplyReport {
    fn start(dry_run: bool) -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            dry_run,
            deleted: 0,
            upserted: 0,
            skipped: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Whether every classified record reached its desired state
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Wall-clock duration of the pass
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at.signed_duration_since(self.started_at)
    }

    /// One-line pass summary
    pub fn summary(&self) -> String {
        format!(
            "Pass finished{} in {} ms: {} deleted, {} upserted, {} skipped, {} failed",
            if self.dry_run { " [DRY-RUN]" } else { "" },
            self.elapsed().num_milliseconds(),
            self.deleted,
            self.upserted,
            self.skipped.len(),
            self.errors.len()
        )
    }
}

/// Core reconciler
///
/// Owns the two backend capabilities and the immutable pass settings.
/// Each pass builds its own zone snapshot and warned-names set and drops
/// them when it returns.
pub struct Reconciler {
    /// Zone enumeration capability
    zones_client: Box<dyn ZonesClient>,

    /// Record set CRUD capability
    records_client: Box<dyn RecordsClient>,

    /// Zones considered by every pass
    domain_filter: DomainFilter,

    /// Log mutations instead of performing them
    dry_run: bool,

    /// TTL for written record sets
    record_ttl: u32,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// # Parameters
    ///
    /// - `zones_client`: Zone listing implementation
    /// - `records_client`: Record set CRUD implementation
    /// - `config`: Reconciliation settings
    ///
    /// # Returns
    ///
    /// The reconciler, or a configuration error if `config` is invalid
    pub fn new(
        zones_client: Box<dyn ZonesClient>,
        records_client: Box<dyn RecordsClient>,
        config: &ReconcileConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            zones_client,
            records_client,
            domain_filter: config.domain_filter(),
            dry_run: config.dry_run,
            record_ttl: config.record_ttl,
        })
    }

    /// Whether mutations are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Fetch the zone snapshot for a pass
    ///
    /// # Returns
    ///
    /// - `Ok(ZoneDirectory)`: Zones accepted by the domain filter
    /// - `Err(Error::ZoneFetch)`: If the backend could not list zones
    pub async fn zones(&self) -> Result<ZoneDirectory> {
        let zones = self.zones_client.list_zones().await.map_err(|e| match e {
            Error::ZoneFetch(_) => e,
            other => Error::zone_fetch(other.to_string()),
        })?;

        let total = zones.len();
        let directory = ZoneDirectory::filtered(zones, &self.domain_filter);
        debug!(
            "Found {} zone(s), {} accepted by domain filter '{}'",
            total,
            directory.len(),
            self.domain_filter.as_str()
        );

        Ok(directory)
    }

    /// List the current records of every managed zone
    ///
    /// Only A, CNAME and TXT record sets are returned; NS, SOA and other
    /// types are skipped.
    pub async fn records(&self) -> Result<Vec<Endpoint>> {
        debug!("Retrieving DNS records");
        let directory = self.zones().await?;
        let mut endpoints = Vec::new();

        for zone in directory.zones() {
            let records = self.records_client.list_records(zone).await?;

            for record in &records {
                match record.to_endpoint(&zone.name) {
                    Some(endpoint) => {
                        debug!("Found record in zone '{}': {}", zone.name, endpoint);
                        endpoints.push(endpoint);
                    }
                    None => debug!(
                        "Skipping record '{}' of type '{}' in zone '{}'",
                        record.name.as_deref().unwrap_or_default(),
                        record.type_name().unwrap_or_default(),
                        zone.name
                    ),
                }
            }
        }

        Ok(endpoints)
    }

    /// Fetch zones and apply `changes` against them
    ///
    /// # Returns
    ///
    /// - `Ok(ApplyReport)`: The batch was processed, possibly with
    ///   per-record failures
    /// - `Err(Error::ZoneFetch)`: No change was applied
    pub async fn apply_changes(&self, changes: &Changes) -> Result<ApplyReport> {
        debug!("Applying changes");
        let directory = self.zones().await?;
        Ok(self.apply(&directory, changes).await)
    }

    /// Apply `changes` against an existing zone snapshot
    ///
    /// Every deletion is attempted before any upsert. Individual failures
    /// are logged and collected in the report; they never stop the batch.
    pub async fn apply(&self, directory: &ZoneDirectory, changes: &Changes) -> ApplyReport {
        let mut report = ApplyReport::start(self.dry_run);

        let mut warned = WarnedNames::new();
        let classification = classify(directory, changes, &mut warned);
        report.skipped = classification.skipped;

        for pending in &classification.deletions {
            for endpoint in &pending.endpoints {
                match self.delete_endpoint(&pending.zone, endpoint).await {
                    Ok(()) => report.deleted += 1,
                    Err(e) => report
                        .errors
                        .push(self.record_error(&pending.zone, endpoint, Operation::Delete, e)),
                }
            }
        }

        for pending in &classification.updates {
            for endpoint in &pending.endpoints {
                match self.upsert_endpoint(&pending.zone, endpoint).await {
                    Ok(()) => report.upserted += 1,
                    Err(e) => report
                        .errors
                        .push(self.record_error(&pending.zone, endpoint, Operation::Upsert, e)),
                }
            }
        }

        report.finished_at = Utc::now();
        info!("{}", report.summary());

        report
    }

    async fn delete_endpoint(&self, zone: &Zone, endpoint: &Endpoint) -> Result<()> {
        let relative_name = to_zone_relative_name(&endpoint.dns_name, &zone.name);
        let record_type = endpoint.parsed_record_type()?;

        if self.dry_run {
            info!(
                "[DRY-RUN] Would delete {} record named '{}' for zone '{}'",
                record_type, relative_name, zone.name
            );
            return Ok(());
        }

        info!(
            "Deleting {} record named '{}' for zone '{}'",
            record_type, relative_name, zone.name
        );
        self.records_client
            .delete_record(zone, &relative_name, record_type)
            .await
    }

    async fn upsert_endpoint(&self, zone: &Zone, endpoint: &Endpoint) -> Result<()> {
        let relative_name = to_zone_relative_name(&endpoint.dns_name, &zone.name);
        let record_type = endpoint.parsed_record_type()?;

        if self.dry_run {
            info!(
                "[DRY-RUN] Would update {} record named '{}' to '{}' for zone '{}'",
                record_type, relative_name, endpoint.target, zone.name
            );
            return Ok(());
        }

        info!(
            "Updating {} record named '{}' to '{}' for zone '{}'",
            record_type, relative_name, endpoint.target, zone.name
        );
        self.records_client
            .upsert_record(
                zone,
                &relative_name,
                record_type,
                &endpoint.target,
                self.record_ttl,
            )
            .await
    }

    fn record_error(
        &self,
        zone: &Zone,
        endpoint: &Endpoint,
        operation: Operation,
        error: Error,
    ) -> RecordError {
        let failure = RecordError {
            zone: zone.name.clone(),
            record_name: to_zone_relative_name(&endpoint.dns_name, &zone.name),
            record_type: endpoint.effective_record_type().to_string(),
            operation,
            error,
        };
        error!(
            "Failed to {} {} record named '{}' for zone '{}': {}",
            failure.operation, failure.record_type, failure.record_name, failure.zone, failure.error
        );
        failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RawRecord;
    use crate::RecordType;
    use async_trait::async_trait;

    struct StaticZones(Vec<Zone>);

    #[async_trait]
    impl ZonesClient for StaticZones {
        async fn list_zones(&self) -> Result<Vec<Zone>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenZones;

    #[async_trait]
    impl ZonesClient for BrokenZones {
        async fn list_zones(&self) -> Result<Vec<Zone>> {
            Err(Error::http("connection refused"))
        }
    }

    /// Fails every mutation so that any backend call shows up in the report
    struct RejectingRecords;

    #[async_trait]
    impl RecordsClient for RejectingRecords {
        async fn list_records(&self, _zone: &Zone) -> Result<Vec<RawRecord>> {
            Ok(Vec::new())
        }

        async fn delete_record(&self, _: &Zone, _: &str, _: RecordType) -> Result<()> {
            Err(Error::backend("delete called"))
        }

        async fn upsert_record(
            &self,
            _: &Zone,
            _: &str,
            _: RecordType,
            _: &str,
            _: u32,
        ) -> Result<()> {
            Err(Error::backend("upsert called"))
        }
    }

    fn reconciler(zones: Box<dyn ZonesClient>, dry_run: bool) -> Reconciler {
        Reconciler::new(
            zones,
            Box::new(RejectingRecords),
            &ReconcileConfig::new("example.com").with_dry_run(dry_run),
        )
        .unwrap()
    }

    fn batch() -> Changes {
        Changes {
            create: vec![Endpoint::new("www.example.com", "1.2.3.4", "")],
            delete: vec![Endpoint::new("old.example.com", "old.example.net", "CNAME")],
            ..Changes::default()
        }
    }

    #[test]
    fn test_dry_run_never_calls_backend() {
        let reconciler = reconciler(Box::new(StaticZones(vec![Zone::new("example.com")])), true);

        let report = tokio_test::block_on(reconciler.apply_changes(&batch())).unwrap();

        assert!(report.dry_run);
        assert!(report.is_clean(), "unexpected errors: {:?}", report.errors);
        assert_eq!(report.deleted, 1);
        assert_eq!(report.upserted, 1);
    }

    #[test]
    fn test_live_failures_are_collected() {
        let reconciler = reconciler(Box::new(StaticZones(vec![Zone::new("example.com")])), false);

        let report = tokio_test::block_on(reconciler.apply_changes(&batch())).unwrap();

        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].operation, Operation::Delete);
        assert_eq!(report.errors[0].record_name, "old");
        assert_eq!(report.errors[1].operation, Operation::Upsert);
        assert_eq!(report.errors[1].record_type, "A");
    }

    #[test]
    fn test_zone_fetch_failure_is_fatal() {
        let reconciler = reconciler(Box::new(BrokenZones), false);

        let result = tokio_test::block_on(reconciler.apply_changes(&batch()));
        assert!(matches!(result, Err(Error::ZoneFetch(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Reconciler::new(
            Box::new(StaticZones(Vec::new())),
            Box::new(RejectingRecords),
            &ReconcileConfig::default().with_record_ttl(0),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_summary_counts() {
        let reconciler = reconciler(Box::new(StaticZones(vec![Zone::new("example.com")])), true);
        let changes = Changes {
            create: vec![Endpoint::new("www.other.org", "1.2.3.4", "A")],
            ..batch()
        };

        let report = tokio_test::block_on(reconciler.apply_changes(&changes)).unwrap();
        let summary = report.summary();

        assert!(summary.starts_with("Pass finished [DRY-RUN] in "));
        assert!(summary.ends_with(": 1 deleted, 0 upserted, 1 skipped, 0 failed"));
    }
}
