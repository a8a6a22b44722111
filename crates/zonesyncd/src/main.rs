// # zonesyncd - Zone Reconciliation Daemon
//
// A thin integration layer: all matching, classification and apply logic
// lives in zonesync-core. Configuration is via environment variables only.
//
// The zonesyncd daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering providers and creating the configured one
// 4. Running reconciliation passes until shutdown
//
// ## Configuration
//
// ### DNS Provider
// - `ZONESYNC_PROVIDER_TYPE`: Provider type (azure)
// - `ZONESYNC_AZURE_CONFIG_FILE`: Path to the Azure YAML config file
// - `ZONESYNC_AZURE_ACCESS_TOKEN`: Resource Manager bearer token
//
// ### Reconciliation
// - `ZONESYNC_DESIRED_FILE`: JSON file with the desired endpoints (required)
// - `ZONESYNC_DOMAIN_FILTER`: Only manage zones ending with this suffix
// - `ZONESYNC_DRY_RUN`: `true` or `1` to log changes instead of applying them
// - `ZONESYNC_RECORD_TTL`: TTL of written record sets (default 300)
//
// ### Loop
// - `ZONESYNC_INTERVAL_SECS`: Seconds between passes (default 60)
// - `ZONESYNC_ONCE`: `true` or `1` to run a single pass and exit
// - `ZONESYNC_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export ZONESYNC_AZURE_CONFIG_FILE=/etc/kubernetes/azure.yaml
// export ZONESYNC_AZURE_ACCESS_TOKEN=eyJ0eXAi...
// export ZONESYNC_DESIRED_FILE=/var/lib/zonesync/desired.json
// export ZONESYNC_DOMAIN_FILTER=example.com
//
// zonesyncd
// ```

mod desired;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use zonesync_core::config::DEFAULT_RECORD_TTL;
use zonesync_core::{ApplyReport, Plan, Provider, ProviderConfig, ProviderRegistry, ReconcileConfig};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Default seconds between reconciliation passes
const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum ZonesyncExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<ZonesyncExitCode> for ExitCode {
    fn from(code: ZonesyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    provider_type: String,
    azure_config_file: String,
    azure_access_token: String,
    desired_file: PathBuf,
    domain_filter: String,
    dry_run: bool,
    record_ttl: u32,
    interval_secs: u64,
    once: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let record_ttl = match var("ZONESYNC_RECORD_TTL") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("ZONESYNC_RECORD_TTL must be a number. Got: {}", raw))?,
            None => DEFAULT_RECORD_TTL,
        };

        let interval_secs = match var("ZONESYNC_INTERVAL_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("ZONESYNC_INTERVAL_SECS must be a number. Got: {}", raw))?,
            None => DEFAULT_INTERVAL_SECS,
        };

        Ok(Self {
            provider_type: var("ZONESYNC_PROVIDER_TYPE").unwrap_or_else(|| "azure".to_string()),
            azure_config_file: var("ZONESYNC_AZURE_CONFIG_FILE").unwrap_or_default(),
            azure_access_token: var("ZONESYNC_AZURE_ACCESS_TOKEN").unwrap_or_default(),
            desired_file: var("ZONESYNC_DESIRED_FILE")
                .map(PathBuf::from)
                .unwrap_or_default(),
            domain_filter: var("ZONESYNC_DOMAIN_FILTER").unwrap_or_default(),
            dry_run: var("ZONESYNC_DRY_RUN").is_some_and(|v| is_truthy(&v)),
            record_ttl,
            interval_secs,
            once: var("ZONESYNC_ONCE").is_some_and(|v| is_truthy(&v)),
            log_level: var("ZONESYNC_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.provider_type.as_str() {
            "azure" => {
                if self.azure_config_file.is_empty() {
                    anyhow::bail!(
                        "ZONESYNC_AZURE_CONFIG_FILE is required. \
                        Set it via: export ZONESYNC_AZURE_CONFIG_FILE=/etc/kubernetes/azure.yaml"
                    );
                }
                if self.azure_access_token.is_empty() {
                    anyhow::bail!(
                        "ZONESYNC_AZURE_ACCESS_TOKEN is required. \
                        Set it via: export ZONESYNC_AZURE_ACCESS_TOKEN=your_token"
                    );
                }
            }
            _ => anyhow::bail!(
                "ZONESYNC_PROVIDER_TYPE '{}' is not supported. \
                Supported providers: azure",
                self.provider_type
            ),
        }

        if self.desired_file.as_os_str().is_empty() {
            anyhow::bail!(
                "ZONESYNC_DESIRED_FILE is required. \
                Set it via: export ZONESYNC_DESIRED_FILE=/var/lib/zonesync/desired.json"
            );
        }

        if !(10..=3600).contains(&self.interval_secs) {
            anyhow::bail!(
                "ZONESYNC_INTERVAL_SECS must be between 10 and 3600 seconds. Got: {}",
                self.interval_secs
            );
        }

        self.reconcile().validate()?;

        parse_log_level(&self.log_level).ok_or_else(|| {
            anyhow::anyhow!(
                "ZONESYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            )
        })?;

        Ok(())
    }

    fn provider(&self) -> ProviderConfig {
        ProviderConfig::Azure {
            config_file: self.azure_config_file.clone(),
            access_token: self.azure_access_token.clone(),
        }
    }

    fn reconcile(&self) -> ReconcileConfig {
        ReconcileConfig::new(self.domain_filter.clone())
            .with_dry_run(self.dry_run)
            .with_record_ttl(self.record_ttl)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

fn parse_log_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ZonesyncExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return ZonesyncExitCode::ConfigError.into();
    }

    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ZonesyncExitCode::ConfigError.into();
    }

    info!("Starting zonesyncd daemon");

    let registry = ProviderRegistry::new();

    #[cfg(feature = "azure")]
    {
        info!("Registering Azure provider");
        zonesync_provider_azure::register(&registry);
    }

    let provider = match registry.create_provider(&config.provider(), &config.reconcile()) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to create provider: {}", e);
            return ZonesyncExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ZonesyncExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(&config, provider.as_ref()).await {
            error!("Daemon error: {:#}", e);
            ZonesyncExitCode::RuntimeError
        } else {
            ZonesyncExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run passes until a shutdown signal arrives
///
/// Passes never overlap: a tick that fires while a pass is running is
/// delayed until the pass returns.
async fn run_daemon(config: &Config, provider: &dyn Provider) -> Result<()> {
    info!(
        "Managing zones matching '{}' with provider '{}'",
        config.domain_filter,
        provider.provider_name()
    );

    if config.once {
        return run_pass(config, provider).await.map(|_| ());
    }

    let mut interval = tokio::time::interval(Duration::from_secs(config.interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut ticks = IntervalStream::new(interval);

    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            signal = &mut shutdown => {
                info!("Received shutdown signal: {}", signal?);
                info!("Shutting down daemon");
                return Ok(());
            }
            tick = ticks.next() => {
                if tick.is_none() {
                    return Ok(());
                }
                if let Err(e) = run_pass(config, provider).await {
                    error!("Reconciliation pass failed: {:#}", e);
                }
            }
        }
    }
}

/// One reconciliation pass: desired file, current records, plan, apply
async fn run_pass(config: &Config, provider: &dyn Provider) -> Result<ApplyReport> {
    let desired = desired::load(&config.desired_file)?;
    let current = provider
        .records()
        .await
        .context("failed to list current records")?;

    let changes = Plan::new(current, desired).calculate();
    if changes.is_empty() {
        info!("All records are already up to date");
    }

    let report = provider
        .apply_changes(&changes)
        .await
        .context("failed to apply changes")?;

    log_report(&report);
    Ok(report)
}

fn log_report(report: &ApplyReport) {
    if !report.is_clean() {
        warn!("{} record(s) failed in this pass", report.errors.len());
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
