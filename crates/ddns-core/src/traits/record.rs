// # Record Target
//
// The (domain, host, IP version) triple identifying which DNS name an
// adapter keeps in sync. Fixed at construction; adapters only read it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

use crate::format;

/// IP version (v4 or v6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IpVersion {
    #[default]
    #[serde(rename = "ipv4")]
    V4,
    #[serde(rename = "ipv6")]
    V6,
}

impl IpVersion {
    /// IP version of an address
    pub fn of(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => IpVersion::V4,
            IpAddr::V6(_) => IpVersion::V6,
        }
    }

    /// DNS record type holding addresses of this version
    pub fn record_type(self) -> &'static str {
        match self {
            IpVersion::V4 => "A",
            IpVersion::V6 => "AAAA",
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::V4 => f.write_str("ipv4"),
            IpVersion::V6 => f.write_str("ipv6"),
        }
    }
}

/// DNS name kept in sync by an adapter
///
/// `host` may be [`format::APEX_HOST`] or [`format::WILDCARD_HOST`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTarget {
    domain: String,
    host: String,
    ip_version: IpVersion,
}

impl RecordTarget {
    pub fn new(domain: impl Into<String>, host: impl Into<String>, ip_version: IpVersion) -> Self {
        Self {
            domain: domain.into(),
            host: host.into(),
            ip_version,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn ip_version(&self) -> IpVersion {
        self.ip_version
    }

    /// Fully-qualified name the vendor APIs expect
    pub fn domain_name(&self) -> String {
        format::build_domain_name(&self.host, &self.domain)
    }
}
