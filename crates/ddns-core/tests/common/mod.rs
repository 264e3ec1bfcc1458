#![allow(dead_code)]

//! Test doubles and common utilities for adapter contract tests
//!
//! `StubProvider` stands in for a vendor: it answers from configuration
//! instead of the network, so the contracts of the layer can be checked
//! without HTTP.

use async_trait::async_trait;
use ddns_core::error::{Error, Result};
use ddns_core::http;
use ddns_core::registry::{ProviderKind, ProviderRegistry};
use ddns_core::traits::{DnsProvider, IpVersion, RecordTarget};
use reqwest::Client;
use serde::Deserialize;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default, Deserialize)]
pub struct StubSettings {
    /// Address the fake vendor reports, defaults to the requested one
    #[serde(default)]
    pub echo: Option<IpAddr>,
    /// Simulated round trip duration
    #[serde(default)]
    pub delay_ms: u64,
    /// Refuse construction when set
    #[serde(default)]
    pub token: Option<String>,
}

/// A DnsProvider that answers from configuration and counts calls
#[derive(Debug)]
pub struct StubProvider {
    target: RecordTarget,
    settings: StubSettings,
    update_call_count: AtomicUsize,
}

impl StubProvider {
    pub fn new(
        config: &serde_json::Value,
        domain: &str,
        host: &str,
        ip_version: IpVersion,
    ) -> Result<Self> {
        let settings = StubSettings::deserialize(config)
            .map_err(|e| Error::malformed_config(e.to_string()))?;

        if let Some(token) = &settings.token {
            ddns_core::validation::check_token(token)?;
        }

        Ok(Self {
            target: RecordTarget::new(domain, host, ip_version),
            settings,
            update_call_count: AtomicUsize::new(0),
        })
    }

    /// Get the number of times update() was called
    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsProvider for StubProvider {
    fn target(&self) -> &RecordTarget {
        &self.target
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }

    fn provider_display_name(&self) -> &'static str {
        "Stub"
    }

    fn provider_url(&self) -> &'static str {
        "https://stub.invalid/"
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        _client: &Client,
        ip: IpAddr,
    ) -> Result<IpAddr> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);

        let delay = Duration::from_millis(self.settings.delay_ms);
        http::cancellable(cancel, async {
            tokio::time::sleep(delay).await;
            Ok(())
        })
        .await?;

        let received = self.settings.echo.unwrap_or(ip);
        if received != ip {
            return Err(Error::IpReceivedMismatch { sent: ip, received });
        }
        Ok(received)
    }
}

fn construct_stub(
    config: &serde_json::Value,
    domain: &str,
    host: &str,
    ip_version: IpVersion,
) -> Result<Box<dyn DnsProvider>> {
    Ok(Box::new(StubProvider::new(config, domain, host, ip_version)?))
}

/// Registry with the stub registered under every provider kind
pub fn stub_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    for kind in ProviderKind::ALL {
        registry.register(kind, construct_stub);
    }
    registry
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}
