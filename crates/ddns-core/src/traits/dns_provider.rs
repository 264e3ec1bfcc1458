// # DNS Provider Trait
//
// Defines the contract every vendor adapter satisfies.
//
// ## Implementations
//
// - Namecheap (single GET, XML answer): `ddns-provider-namecheap` crate
// - DigitalOcean (lookup then PUT, JSON): `ddns-provider-digitalocean` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
// use tokio_util::sync::CancellationToken;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//     let client = reqwest::Client::new();
//     let cancel = CancellationToken::new();
//
//     let confirmed = provider
//         .update(&cancel, &client, "203.0.113.5".parse()?)
//         .await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::net::IpAddr;
use tokio_util::sync::CancellationToken;

use super::record::{IpVersion, RecordTarget};
use crate::format;

/// Display descriptor consumed by a status page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlRow {
    /// Anchor to the fully-qualified name
    pub domain: String,
    pub host: String,
    /// Anchor to the vendor's site
    pub provider: String,
    pub ip_version: String,
}

/// Trait for DNS provider adapters
///
/// An adapter is built once from validated configuration and is immutable
/// afterwards, so one instance may serve concurrent callers.
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS calls to the vendor's endpoints only
/// - ✅ Parse vendor-specific responses
/// - ✅ Return a verified IP or a classified failure
///
/// ## Forbidden Capabilities
/// - ❌ Retry, back off or rate limit (owned by the scheduler)
/// - ❌ Cache anything across calls, including record identifiers
/// - ❌ Spawn tasks or threads
/// - ❌ Create records that do not exist yet
#[async_trait]
pub trait DnsProvider: Send + Sync + std::fmt::Debug {
    /// Record this adapter keeps in sync
    fn target(&self) -> &RecordTarget;

    /// Short vendor identifier, e.g. "namecheap"
    fn provider_name(&self) -> &'static str;

    /// Vendor name as shown to people, e.g. "Namecheap"
    fn provider_display_name(&self) -> &'static str;

    /// Vendor home page
    fn provider_url(&self) -> &'static str;

    fn domain(&self) -> &str {
        self.target().domain()
    }

    fn host(&self) -> &str {
        self.target().host()
    }

    fn ip_version(&self) -> IpVersion {
        self.target().ip_version()
    }

    /// Whether the vendor fronts traffic for the record
    fn proxied(&self) -> bool {
        false
    }

    fn build_domain_name(&self) -> String {
        self.target().domain_name()
    }

    /// One-line description for logs
    fn describe(&self) -> String {
        format::describe(
            self.domain(),
            self.host(),
            self.provider_name(),
            self.ip_version(),
        )
    }

    fn html_row(&self) -> HtmlRow {
        let fqdn = self.build_domain_name();
        HtmlRow {
            domain: format::link(&format!("http://{}", fqdn), &fqdn),
            host: self.host().to_string(),
            provider: format::link(self.provider_url(), self.provider_display_name()),
            ip_version: self.ip_version().to_string(),
        }
    }

    /// Point the record at `ip`.
    ///
    /// Returns the IP the vendor reports holding after the update. Success
    /// is only reported when that IP is the one requested, unless the
    /// adapter is configured to let the vendor infer the address.
    ///
    /// # Parameters
    ///
    /// - `cancel`: aborts the call with [`crate::Error::Cancelled`]
    /// - `client`: caller-owned HTTP client, possibly shared
    /// - `ip`: address to publish
    async fn update(
        &self,
        cancel: &CancellationToken,
        client: &Client,
        ip: IpAddr,
    ) -> Result<IpAddr, crate::Error>;
}

/// Constructor every adapter crate exposes to the registry
///
/// Receives the opaque configuration blob and the record target fields.
/// Must not perform I/O.
pub type ProviderConstructor = fn(
    config: &serde_json::Value,
    domain: &str,
    host: &str,
    ip_version: IpVersion,
) -> Result<Box<dyn DnsProvider>, crate::Error>;
