// # DigitalOcean DNS Provider
//
// DigitalOcean updates records by identifier, so each update is a
// lookup followed by a mutation:
//
// ```http
// GET /v2/domains/example.org/records?name=api.example.org&type=A
// Authorization: Bearer <token>
//
// PUT /v2/domains/example.org/records/42
// Authorization: Bearer <token>
// {"type": "A", "name": "api", "data": "198.51.100.9"}
// ```
//
// The record identifier is resolved on every update and lives only for the
// duration of that call. Records are never created: a missing record fails
// the update.
//
// ## API Reference
//
// - List records: GET `/v2/domains/:domain/records?name=...&type=...`
// - Update record: PUT `/v2/domains/:domain/records/:id`

use async_trait::async_trait;
use ddns_core::registry::{ProviderKind, ProviderRegistry};
use ddns_core::traits::{DnsProvider, IpVersion, RecordTarget};
use ddns_core::{Error, Result, headers, http, validation};
use reqwest::{Body, Client, Method, Request, Url};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use tokio_util::sync::CancellationToken;

/// DigitalOcean API base URL
const DIGITALOCEAN_API_BASE: &str = "https://api.digitalocean.com";

const PROVIDER_NAME: &str = "digitalocean";

#[derive(Debug, Deserialize)]
struct DigitalOceanSettings {
    #[serde(default)]
    token: String,
}

#[derive(Debug, Deserialize)]
struct ListRecordsResponse {
    #[serde(default)]
    domain_records: Vec<RecordId>,
}

#[derive(Debug, Deserialize)]
struct RecordId {
    #[serde(default)]
    id: Option<u64>,
}

#[derive(Debug, Serialize)]
struct UpdateRecordRequest<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct UpdateRecordResponse {
    domain_record: RecordData,
}

#[derive(Debug, Deserialize)]
struct RecordData {
    #[serde(default)]
    data: String,
}

/// DigitalOcean DNS provider
pub struct DigitalOceanProvider {
    target: RecordTarget,

    /// API token with write access to the domain
    /// ⚠️ NEVER log this value
    token: String,

    base_url: String,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for DigitalOceanProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitalOceanProvider")
            .field("target", &self.target)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

impl DigitalOceanProvider {
    /// Create a new DigitalOcean provider
    ///
    /// # Parameters
    ///
    /// - `config`: blob with a non-empty `token`
    /// - `domain`, `host`, `ip_version`: the record to keep in sync
    pub fn new(
        config: &serde_json::Value,
        domain: &str,
        host: &str,
        ip_version: IpVersion,
    ) -> Result<Self> {
        let settings = DigitalOceanSettings::deserialize(config)
            .map_err(|e| Error::malformed_config(e.to_string()))?;

        validation::check_token(&settings.token)?;

        Ok(Self {
            target: RecordTarget::new(domain, host, ip_version),
            token: settings.token,
            base_url: DIGITALOCEAN_API_BASE.to_string(),
        })
    }

    /// Send requests to `base_url` instead of the public API
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `<base>/v2/domains/<domain>/records[/<id>]`
    fn records_url(&self, record_id: Option<u64>) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::request_build(format!("invalid base URL: {}", e)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::request_build("base URL cannot have a path"))?;
            segments
                .pop_if_empty()
                .extend(["v2", "domains", self.target.domain(), "records"]);
            if let Some(id) = record_id {
                segments.push(&id.to_string());
            }
        }

        Ok(url)
    }

    fn set_headers(&self, request: &mut Request) -> Result<()> {
        headers::set_user_agent(request);
        headers::set_content_type(request, "application/json");
        headers::set_accept(request, "application/json");
        headers::set_auth_bearer(request, &self.token)
    }

    /// Resolve the identifier of the record to update
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /v2/domains/:domain/records?name=:fqdn&type=:type
    /// ```
    async fn get_record_id(
        &self,
        cancel: &CancellationToken,
        client: &Client,
        record_type: &str,
    ) -> Result<u64> {
        let record_name = self.build_domain_name();
        tracing::debug!(
            "Looking up record ID: {} (type: {})",
            record_name,
            record_type
        );

        let mut url = self.records_url(None)?;
        url.query_pairs_mut()
            .append_pair("name", &record_name)
            .append_pair("type", record_type);

        let mut request = Request::new(Method::GET, url);
        self.set_headers(&mut request)?;

        let body = http::execute(cancel, client, request).await?;
        let parsed: ListRecordsResponse =
            serde_json::from_str(&body).map_err(|e| Error::UnmarshalResponse(e.to_string()))?;

        let record = match parsed.domain_records.as_slice() {
            [] => return Err(Error::RecordNotFound),
            [record] => record,
            records => {
                return Err(Error::AmbiguousRecord {
                    count: records.len(),
                });
            }
        };

        let id = match record.id {
            None | Some(0) => return Err(Error::RecordIdNotFound),
            Some(id) => id,
        };

        tracing::debug!("Found record ID: {}", id);
        Ok(id)
    }

    fn update_body(&self, record_type: &str, ip: IpAddr) -> Result<Vec<u8>> {
        let payload = UpdateRecordRequest {
            record_type,
            name: self.target.host(),
            data: ip.to_string(),
        };
        serde_json::to_vec(&payload).map_err(|e| Error::RequestEncode(e.to_string()))
    }
}

#[async_trait]
impl DnsProvider for DigitalOceanProvider {
    fn target(&self) -> &RecordTarget {
        &self.target
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn provider_display_name(&self) -> &'static str {
        "DigitalOcean"
    }

    fn provider_url(&self) -> &'static str {
        "https://www.digitalocean.com/"
    }

    /// Update the record with a lookup followed by a PUT
    ///
    /// The PUT is only sent once the lookup has produced exactly one record
    /// with a usable identifier. The echoed `data` must equal `ip`.
    async fn update(
        &self,
        cancel: &CancellationToken,
        client: &Client,
        ip: IpAddr,
    ) -> Result<IpAddr> {
        let record_type = IpVersion::of(&ip).record_type();

        tracing::info!(
            "Updating DigitalOcean record {} -> {} ({})",
            self.build_domain_name(),
            ip,
            record_type
        );

        let record_id = self
            .get_record_id(cancel, client, record_type)
            .await
            .map_err(|e| e.context("getting record id"))?;

        let mut request = Request::new(Method::PUT, self.records_url(Some(record_id))?);
        self.set_headers(&mut request)?;
        *request.body_mut() = Some(Body::from(self.update_body(record_type, ip)?));

        let body = http::execute(cancel, client, request).await?;
        let parsed: UpdateRecordResponse =
            serde_json::from_str(&body).map_err(|e| Error::UnmarshalResponse(e.to_string()))?;

        let reported = parsed.domain_record.data.trim();
        let new_ip: IpAddr = reported
            .parse()
            .map_err(|_| Error::IpReceivedMalformed(reported.to_string()))?;

        if new_ip != ip {
            return Err(Error::IpReceivedMismatch {
                sent: ip,
                received: new_ip,
            });
        }

        tracing::info!(
            "DigitalOcean record updated: {} -> {}",
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
    Ok(Box::new(DigitalOceanProvider::new(
        config, domain, host, ip_version,
    )?))
}

/// Register the DigitalOcean provider with a registry
pub fn register(registry: &mut ProviderRegistry) {
    registry.register(ProviderKind::DigitalOcean, construct);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddns_core::ErrorKind;
    use serde_json::json;

    fn provider() -> DigitalOceanProvider {
        DigitalOceanProvider::new(&json!({ "token": "tok123" }), "example.org", "api", IpVersion::V4)
            .unwrap()
    }

    #[test]
    fn test_accessors_round_trip() {
        for version in [IpVersion::V4, IpVersion::V6] {
            let p = DigitalOceanProvider::new(&json!({ "token": "tok123" }), "example.org", "api", version)
                .unwrap();

            assert_eq!(p.domain(), "example.org");
            assert_eq!(p.host(), "api");
            assert_eq!(p.ip_version(), version);
            assert!(!p.proxied());
            assert_eq!(p.build_domain_name(), "api.example.org");
        }
    }

    #[test]
    fn test_empty_token() {
        for blob in [json!({}), json!({ "token": "" })] {
            let err = DigitalOceanProvider::new(&blob, "example.org", "api", IpVersion::V4).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::EmptyToken);
        }
    }

    #[test]
    fn test_malformed_config() {
        let err = DigitalOceanProvider::new(&json!([1, 2]), "example.org", "api", IpVersion::V4)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedConfig);
    }

    #[test]
    fn test_records_url() {
        let p = provider();

        assert_eq!(
            p.records_url(None).unwrap().as_str(),
            "https://api.digitalocean.com/v2/domains/example.org/records"
        );
        assert_eq!(
            p.records_url(Some(42)).unwrap().as_str(),
            "https://api.digitalocean.com/v2/domains/example.org/records/42"
        );
    }

    #[test]
    fn test_update_body() {
        let p = provider();
        let body = p.update_body("A", "198.51.100.9".parse().unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value, json!({ "type": "A", "name": "api", "data": "198.51.100.9" }));
    }

    #[test]
    fn test_token_not_exposed_in_debug() {
        let p = DigitalOceanProvider::new(
            &json!({ "token": "secret_token_12345" }),
            "example.org",
            "api",
            IpVersion::V4,
        )
        .unwrap();

        let debug_str = format!("{:?}", p);
        assert!(!debug_str.contains("secret_token"));
        assert!(debug_str.contains("DigitalOceanProvider"));
    }

    #[test]
    fn test_register() {
        let mut registry = ProviderRegistry::new();
        register(&mut registry);

        let p = registry
            .create(
                ProviderKind::DigitalOcean,
                &json!({ "token": "tok123" }),
                "example.org",
                "*",
                IpVersion::V6,
            )
            .unwrap();
        assert_eq!(p.provider_name(), "digitalocean");
        assert_eq!(p.build_domain_name(), "any.example.org");
        assert_eq!(
            p.describe(),
            "[domain: example.org | host: * | provider: digitalocean | ip: ipv6]"
        );
    }

    #[test]
    fn test_html_row() {
        let row = provider().html_row();

        assert_eq!(row.domain, "<a href=\"http://api.example.org\">api.example.org</a>");
        assert_eq!(row.host, "api");
        assert_eq!(row.provider, "<a href=\"https://www.digitalocean.com/\">DigitalOcean</a>");
        assert_eq!(row.ip_version, "ipv4");
    }
}
