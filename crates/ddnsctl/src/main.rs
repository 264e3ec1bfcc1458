// # ddnsctl - DDNS one-shot runner
//
// Thin integration layer over the provider adapters:
// 1. Reading configuration from environment variables
// 2. Registering the built-in providers
// 3. Building every configured adapter (bad settings fail here, offline)
// 4. Pushing one IP to every record of that IP version concurrently
//
// It does not detect IP changes, schedule, or retry. Run it from whatever
// decides that the IP changed.
//
// ## Configuration
//
// - `DDNS_CONFIG`: Path to the settings document (default `config.json`)
// - `DDNS_IP`: IP address to publish (required)
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default info)
// - `DDNS_HTTP_TIMEOUT_SECS`: HTTP client timeout (default 30)
//
// ## Example
//
// ```bash
// export DDNS_CONFIG=/etc/ddns/config.json
// export DDNS_IP=203.0.113.5
//
// ddnsctl
// ```

use anyhow::{Context, Result};
use ddns_core::{DnsProvider, IpVersion, ProviderRegistry, Settings};
use std::env;
use std::net::IpAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Every record was updated
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// At least one record failed to update
    UpdateFailed = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

const DEFAULT_CONFIG_PATH: &str = "config.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Application configuration
#[derive(Debug)]
struct Config {
    config_path: String,
    ip: String,
    log_level: String,
    http_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let http_timeout_secs = match lookup("DDNS_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().with_context(|| {
                format!("DDNS_HTTP_TIMEOUT_SECS must be a whole number of seconds. Got: {}", raw)
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            config_path: lookup("DDNS_CONFIG").unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string()),
            ip: lookup("DDNS_IP").context(
                "DDNS_IP is required. Set it via: export DDNS_IP=203.0.113.5",
            )?,
            log_level: lookup("DDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            http_timeout_secs,
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.config_path.trim().is_empty() {
            anyhow::bail!("DDNS_CONFIG cannot be empty");
        }

        self.ip_addr()?;

        if !(1..=300).contains(&self.http_timeout_secs) {
            anyhow::bail!(
                "DDNS_HTTP_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                self.http_timeout_secs
            );
        }

        self.log_level()?;

        Ok(())
    }

    fn ip_addr(&self) -> Result<IpAddr> {
        self.ip
            .trim()
            .parse()
            .with_context(|| format!("DDNS_IP is not a valid IP address. Got: {}", self.ip))
    }

    fn log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return DdnsExitCode::ConfigError.into();
    }

    let log_level = config.log_level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Starting ddnsctl");

    let providers = match load_providers(&config) {
        Ok(providers) => providers,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };
    info!("Configuration loaded: {} record(s)", providers.len());

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    rt.block_on(async {
        match run(&config, providers).await {
            Ok(0) => DdnsExitCode::Success,
            Ok(failed) => {
                error!("{} record(s) failed to update", failed);
                DdnsExitCode::UpdateFailed
            }
            Err(e) => {
                error!("Startup error: {:#}", e);
                DdnsExitCode::ConfigError
            }
        }
    })
    .into()
}

fn registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    #[cfg(feature = "namecheap")]
    ddns_provider_namecheap::register(&mut registry);

    #[cfg(feature = "digitalocean")]
    ddns_provider_digitalocean::register(&mut registry);

    info!(
        "Registered providers: {}",
        registry
            .list_providers()
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    registry
}

/// Read the settings document and build every adapter it lists
fn load_providers(config: &Config) -> Result<Vec<Arc<dyn DnsProvider>>> {
    let settings = Settings::from_file(&config.config_path)
        .with_context(|| format!("loading {}", config.config_path))?;

    let providers = settings.build_providers(&registry())?;
    Ok(providers.into_iter().map(Arc::from).collect())
}

/// Keep the records whose IP version matches `ip`
fn records_for_ip(providers: Vec<Arc<dyn DnsProvider>>, ip: IpAddr) -> Vec<Arc<dyn DnsProvider>> {
    let version = IpVersion::of(&ip);
    providers
        .into_iter()
        .filter(|provider| {
            let matches = provider.ip_version() == version;
            if !matches {
                info!(
                    "Skipping {}: {} is not an {} address",
                    provider.describe(),
                    ip,
                    provider.ip_version()
                );
            }
            matches
        })
        .collect()
}

/// Push the configured IP to every matching record, returning how many failed
async fn run(config: &Config, providers: Vec<Arc<dyn DnsProvider>>) -> Result<usize> {
    let ip = config.ip_addr()?;
    let providers = records_for_ip(providers, ip);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .context("building HTTP client")?;

    let cancel = CancellationToken::new();
    let shutdown = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            match wait_for_shutdown().await {
                Ok(signal) => {
                    warn!("Received {}, cancelling in-flight updates", signal);
                    cancel.cancel();
                }
                Err(e) => error!("Shutdown handler error: {}", e),
            }
        }
    });

    let mut tasks = JoinSet::new();
    for provider in providers {
        let client = client.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move {
            let result = provider.update(&cancel, &client, ip).await;
            (provider, result)
        });
    }

    let mut failed = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((provider, Ok(new_ip))) => {
                info!("{} updated to {}", provider.describe(), new_ip);
            }
            Ok((provider, Err(e))) => {
                error!("{} failed: {}", provider.describe(), e);
                failed += 1;
            }
            Err(e) => {
                error!("Update task panicked: {}", e);
                failed += 1;
            }
        }
    }

    shutdown.abort();
    Ok(failed)
}

/// Wait for SIGTERM or SIGINT
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

/// Wait for Ctrl-C
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DDNS_IP", "203.0.113.5")]).unwrap();

        assert_eq!(config.config_path, "config.json");
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.log_level().unwrap(), Level::INFO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ip_is_required() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("DDNS_IP is required"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_ip = config_from(&[("DDNS_IP", "not-an-ip")]).unwrap();
        assert!(bad_ip.validate().is_err());

        let bad_level = config_from(&[("DDNS_IP", "2001:db8::1"), ("DDNS_LOG_LEVEL", "loud")]).unwrap();
        assert!(bad_level.validate().is_err());

        let bad_timeout =
            config_from(&[("DDNS_IP", "203.0.113.5"), ("DDNS_HTTP_TIMEOUT_SECS", "0")]).unwrap();
        assert!(bad_timeout.validate().is_err());

        assert!(config_from(&[("DDNS_IP", "203.0.113.5"), ("DDNS_HTTP_TIMEOUT_SECS", "soon")]).is_err());
    }

    #[test]
    fn test_registry_has_builtin_providers() {
        let registry = registry();
        let expected = usize::from(cfg!(feature = "namecheap"))
            + usize::from(cfg!(feature = "digitalocean"));

        assert_eq!(registry.list_providers().len(), expected);
        assert_eq!(
            registry.has_provider(ddns_core::ProviderKind::Namecheap),
            cfg!(feature = "namecheap")
        );
        assert_eq!(
            registry.has_provider(ddns_core::ProviderKind::DigitalOcean),
            cfg!(feature = "digitalocean")
        );
    }

    #[cfg(feature = "digitalocean")]
    #[test]
    fn test_records_filtered_by_ip_version() {
        let registry = registry();
        let build = |host: &str, version: IpVersion| -> Arc<dyn DnsProvider> {
            Arc::from(
                registry
                    .create(
                        ddns_core::ProviderKind::DigitalOcean,
                        &serde_json::json!({ "token": "tok123" }),
                        "example.org",
                        host,
                        version,
                    )
                    .unwrap(),
            )
        };
        let providers = vec![build("v4", IpVersion::V4), build("v6", IpVersion::V6)];

        let v6 = records_for_ip(providers.clone(), "2001:db8::1".parse().unwrap());
        let hosts: Vec<&str> = v6.iter().map(|p| p.host()).collect();
        assert_eq!(hosts, ["v6"]);

        let v4 = records_for_ip(providers, "203.0.113.5".parse().unwrap());
        let hosts: Vec<&str> = v4.iter().map(|p| p.host()).collect();
        assert_eq!(hosts, ["v4"]);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(DdnsExitCode::Success as u8, 0);
        assert_eq!(DdnsExitCode::ConfigError as u8, 1);
        assert_eq!(DdnsExitCode::UpdateFailed as u8, 2);
    }
}
