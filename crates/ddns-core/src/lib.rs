// # ddns-core
//
// Provider adapter layer for the DDNS system.
//
// ## Architecture Overview
//
// This library defines what every DNS vendor adapter must satisfy:
// - **DnsProvider**: Trait exposing the record target and the single `update` operation
// - **Error / ErrorKind**: Closed failure taxonomy shared by all adapters
// - **ProviderRegistry**: Static vendor → constructor mapping
// - **headers / http**: Request decoration and cancellable round trips
// - **validation / format**: Pure secret checks and name builders
// - **Settings**: Settings document listing the records to keep in sync
//
// ## Design Principles
//
// 1. **Fail at construction**: Bad configuration never reaches the network
// 2. **Verify every update**: Success only when the vendor echoes the requested IP
// 3. **Stateless adapters**: No caching, no retries, no background tasks
// 4. **Injected transport**: The caller owns the HTTP client and cancellation

pub mod config;
pub mod error;
pub mod format;
pub mod headers;
pub mod http;
pub mod registry;
pub mod traits;
pub mod validation;

// Re-export core types for convenience
pub use config::{RecordSettings, Settings};
pub use error::{Error, ErrorKind, Result};
pub use registry::{ProviderKind, ProviderRegistry};
pub use traits::{DnsProvider, HtmlRow, IpVersion, ProviderConstructor, RecordTarget};
