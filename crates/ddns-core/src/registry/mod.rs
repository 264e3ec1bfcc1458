//! Provider registry
//!
//! Maps each vendor of the closed [`ProviderKind`] set to the plain
//! constructor function exported by its adapter crate.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ddns_core::registry::{ProviderKind, ProviderRegistry};
//! use ddns_core::traits::IpVersion;
//!
//! let mut registry = ProviderRegistry::new();
//! ddns_provider_namecheap::register(&mut registry);
//!
//! let provider = registry.create(
//!     ProviderKind::Namecheap,
//!     &serde_json::json!({ "password": "..." }),
//!     "example.com",
//!     "www",
//!     IpVersion::V4,
//! )?;
//! ```
//!
//! ## Registration
//!
//! Adapter crates expose a `register` function:
//!
//! ```rust,ignore
//! pub fn register(registry: &mut ProviderRegistry) {
//!     registry.register(ProviderKind::Namecheap, construct);
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::traits::{DnsProvider, IpVersion, ProviderConstructor};

/// Vendors known to the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Namecheap,
    DigitalOcean,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Namecheap, ProviderKind::DigitalOcean];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Namecheap => "namecheap",
            ProviderKind::DigitalOcean => "digitalocean",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider registry for building adapters from settings
///
/// Filled once during startup, read-only afterwards.
#[derive(Default)]
pub struct ProviderRegistry {
    constructors: HashMap<ProviderKind, ProviderConstructor>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the constructor for a vendor, replacing any previous one
    pub fn register(&mut self, kind: ProviderKind, constructor: ProviderConstructor) {
        tracing::debug!("Registering provider: {}", kind);
        self.constructors.insert(kind, constructor);
    }

    /// Build an adapter.
    ///
    /// Fails without any I/O when the kind is not registered or the
    /// adapter rejects its configuration.
    pub fn create(
        &self,
        kind: ProviderKind,
        config: &serde_json::Value,
        domain: &str,
        host: &str,
        ip_version: IpVersion,
    ) -> Result<Box<dyn DnsProvider>> {
        let constructor = self
            .constructors
            .get(&kind)
            .ok_or_else(|| Error::UnknownProvider(kind.to_string()))?;

        constructor(config, domain, host, ip_version)
    }

    /// Registered vendors
    pub fn list_providers(&self) -> Vec<ProviderKind> {
        let mut kinds: Vec<_> = self.constructors.keys().copied().collect();
        kinds.sort_by_key(|kind| kind.as_str());
        kinds
    }

    pub fn has_provider(&self, kind: ProviderKind) -> bool {
        self.constructors.contains_key(&kind)
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.list_providers())
            .finish()
    }
}
