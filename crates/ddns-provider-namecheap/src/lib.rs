// # Namecheap DNS Provider
//
// Namecheap's dynamic DNS endpoint takes one GET per update:
//
// ```http
// GET /update?host=www&domain=example.com&password=...&ip=203.0.113.5
// Host: dynamicdns.park-your-domain.com
// ```
//
// and answers with a small XML document:
//
// ```xml
// <interface-response>
//   <IP>203.0.113.5</IP>
//   <ErrCount>0</ErrCount>
//   <errors><Err1>message when the update was refused</Err1></errors>
// </interface-response>
// ```
//
// The answer is HTTP 200 even when the update is refused, so the `errors`
// element is checked before the echoed `IP`.
//
// Only A records are served; IPv6 targets are refused at construction.
//
// ## Security Requirements
//
// - The password travels in the query string: request URLs are never logged
//   and transport errors are stripped of their URL
// - The Debug implementation redacts the password

use async_trait::async_trait;
use ddns_core::registry::{ProviderKind, ProviderRegistry};
use ddns_core::traits::{DnsProvider, IpVersion, RecordTarget};
use ddns_core::{Error, Result, headers, http, validation};
use reqwest::{Client, Method, Request, Url};
use serde::Deserialize;
use std::net::IpAddr;
use tokio_util::sync::CancellationToken;

/// Namecheap dynamic DNS base URL
const NAMECHEAP_DDNS_BASE: &str = "https://dynamicdns.park-your-domain.com";

const PROVIDER_NAME: &str = "namecheap";

/// Vendor-specific keys of the configuration blob
#[derive(Debug, Deserialize)]
struct NamecheapSettings {
    #[serde(default)]
    password: String,
    /// Let Namecheap use the address the request comes from
    #[serde(default)]
    provider_ip: bool,
}

/// Body of the update endpoint's answer
#[derive(Debug, Default, Deserialize)]
struct UpdateResponse {
    #[serde(rename = "IP", default)]
    ip: String,
    #[serde(default)]
    errors: ResponseErrors,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseErrors {
    #[serde(rename = "Err1", default)]
    err1: String,
}

/// Namecheap DNS provider
///
/// Immutable once built; the password has been shape-checked.
pub struct NamecheapProvider {
    target: RecordTarget,

    /// Dynamic DNS password
    /// ⚠️ NEVER log this value
    password: String,

    /// Omit the `ip` parameter and let Namecheap use the caller's address
    use_provider_ip: bool,

    base_url: String,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for NamecheapProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamecheapProvider")
            .field("target", &self.target)
            .field("password", &"<REDACTED>")
            .field("use_provider_ip", &self.use_provider_ip)
            .finish()
    }
}

impl NamecheapProvider {
    /// Create a new Namecheap provider
    ///
    /// # Parameters
    ///
    /// - `config`: blob with `password` and optional `provider_ip`
    /// - `domain`, `host`, `ip_version`: the record to keep in sync
    ///
    /// # Errors
    ///
    /// - `UnsupportedIpVersion` for IPv6 targets
    /// - `MalformedConfig` if the blob is not an object of the expected shape
    /// - `EmptyPassword` / `MalformedPassword` if the password fails its check
    pub fn new(
        config: &serde_json::Value,
        domain: &str,
        host: &str,
        ip_version: IpVersion,
    ) -> Result<Self> {
        if ip_version == IpVersion::V6 {
            return Err(Error::UnsupportedIpVersion {
                provider: PROVIDER_NAME,
                version: ip_version,
            });
        }

        let settings = NamecheapSettings::deserialize(config)
            .map_err(|e| Error::malformed_config(e.to_string()))?;

        validation::check_namecheap_password(&settings.password)?;

        Ok(Self {
            target: RecordTarget::new(domain, host, ip_version),
            password: settings.password,
            use_provider_ip: settings.provider_ip,
            base_url: NAMECHEAP_DDNS_BASE.to_string(),
        })
    }

    /// Send requests to `base_url` instead of the public endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether the `ip` parameter is left out of updates
    pub fn uses_provider_ip(&self) -> bool {
        self.use_provider_ip
    }

    fn update_url(&self, ip: IpAddr) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::request_build(format!("invalid base URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| Error::request_build("base URL cannot have a path"))?
            .pop_if_empty()
            .push("update");

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("host", self.target.host());
            query.append_pair("domain", self.target.domain());
            query.append_pair("password", &self.password);
            if !self.use_provider_ip {
                query.append_pair("ip", &ip.to_string());
            }
        }

        Ok(url)
    }

    fn set_headers(request: &mut Request) {
        headers::set_user_agent(request);
        headers::set_accept(request, "application/xml");
    }
}

/// Decode the update answer and turn an in-band refusal into an error
fn parse_update_response(body: &str) -> Result<IpAddr> {
    let parsed: UpdateResponse =
        quick_xml::de::from_str(body).map_err(|e| Error::UnmarshalResponse(e.to_string()))?;

    let vendor_error = parsed.errors.err1.trim();
    if !vendor_error.is_empty() {
        return Err(Error::UnsuccessfulResponse(vendor_error.to_string()));
    }

    let reported = parsed.ip.trim();
    reported
        .parse()
        .map_err(|_| Error::IpReceivedMalformed(reported.to_string()))
}

#[async_trait]
impl DnsProvider for NamecheapProvider {
    fn target(&self) -> &RecordTarget {
        &self.target
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn provider_display_name(&self) -> &'static str {
        "Namecheap"
    }

    fn provider_url(&self) -> &'static str {
        "https://namecheap.com"
    }

    /// Update the record with a single GET
    ///
    /// With `provider_ip` enabled the address is not sent and whatever
    /// Namecheap reports is accepted; otherwise the reported address must
    /// equal `ip`.
    async fn update(
        &self,
        cancel: &CancellationToken,
        client: &Client,
        ip: IpAddr,
    ) -> Result<IpAddr> {
        tracing::info!(
            "Updating Namecheap record {} -> {}",
            self.build_domain_name(),
            if self.use_provider_ip {
                "<provider ip>".to_string()
            } else {
                ip.to_string()
            }
        );

        let mut request = Request::new(Method::GET, self.update_url(ip)?);
        Self::set_headers(&mut request);

        let body = http::execute(cancel, client, request).await?;
        let new_ip = parse_update_response(&body)?;

        if !self.use_provider_ip && new_ip != ip {
            return Err(Error::IpReceivedMismatch {
                sent: ip,
                received: new_ip,
            });
        }

        tracing::info!(
            "Namecheap record updated: {} -> {}",
            self.build_domain_name(),
            new_ip
        );
        Ok(new_ip)
    }
}

fn construct(
    config: &serde_json::Value,
    domain: &str,
    host: &str,
    ip_version: IpVersion,
) -> Result<Box<dyn DnsProvider>> {
    Ok(Box::new(NamecheapProvider::new(
        config, domain, host, ip_version,
    )?))
}

/// Register the Namecheap provider with a registry
///
/// # Example
///
/// ```rust
/// use ddns_core::{ProviderKind, ProviderRegistry};
///
/// let mut registry = ProviderRegistry::new();
/// ddns_provider_namecheap::register(&mut registry);
/// assert!(registry.has_provider(ProviderKind::Namecheap));
/// ```
pub fn register(registry: &mut ProviderRegistry) {
    registry.register(ProviderKind::Namecheap, construct);
}
