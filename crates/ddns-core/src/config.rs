//! Settings document
//!
//! The settings file lists the records to keep in sync. Keys other than
//! `provider`, `domain`, `host` and `ip_version` are vendor-specific and are
//! handed to the adapter untouched:
//!
//! ```json
//! {
//!   "settings": [
//!     { "provider": "namecheap", "domain": "example.com", "host": "www",
//!       "password": "...", "provider_ip": false },
//!     { "provider": "digitalocean", "domain": "example.org", "host": "api",
//!       "ip_version": "ipv6", "token": "..." }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::registry::{ProviderKind, ProviderRegistry};
use crate::traits::{DnsProvider, IpVersion};

/// Top-level settings document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub settings: Vec<RecordSettings>,
}

impl Settings {
    /// Parse and validate a settings document
    pub fn from_json(data: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(data).map_err(|e| Error::settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a settings file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::settings(format!("reading {}: {}", path.display(), e)))?;
        Self::from_json(&data)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.settings.is_empty() {
            return Err(Error::settings("no records configured"));
        }

        for (index, record) in self.settings.iter().enumerate() {
            record
                .validate()
                .map_err(|e| Error::settings(format!("record {}: {}", index + 1, e)))?;
        }

        Ok(())
    }

    /// Build every configured adapter.
    ///
    /// Stops at the first record the registry refuses; nothing is sent over
    /// the network.
    pub fn build_providers(&self, registry: &ProviderRegistry) -> Result<Vec<Box<dyn DnsProvider>>> {
        self.settings
            .iter()
            .map(|record| record.build_provider(registry))
            .collect()
    }
}

/// One record entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSettings {
    pub provider: ProviderKind,

    pub domain: String,

    /// Host label, "@" for the apex or "*" for a wildcard
    pub host: String,

    #[serde(default)]
    pub ip_version: IpVersion,

    /// Vendor-specific keys
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl RecordSettings {
    pub fn validate(&self) -> Result<()> {
        if self.domain.trim().is_empty() {
            return Err(Error::settings("domain cannot be empty"));
        }
        if self.host.trim().is_empty() {
            return Err(Error::settings("host cannot be empty"));
        }
        Ok(())
    }

    /// Build the adapter for this entry
    pub fn build_provider(&self, registry: &ProviderRegistry) -> Result<Box<dyn DnsProvider>> {
        let blob = serde_json::Value::Object(self.params.clone());
        registry.create(self.provider, &blob, &self.domain, &self.host, self.ip_version)
    }
}
