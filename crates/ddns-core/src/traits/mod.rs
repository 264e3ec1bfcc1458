//! Core traits for the DDNS provider layer
//!
//! - [`DnsProvider`]: the contract every vendor adapter implements
//! - [`RecordTarget`]: the immutable (domain, host, IP version) an adapter serves

pub mod dns_provider;
pub mod record;

pub use dns_provider::{DnsProvider, HtmlRow, ProviderConstructor};
pub use record::{IpVersion, RecordTarget};
