//! String builders shared by adapters
//!
//! Pure helpers: no I/O, no allocation beyond the returned strings.

use crate::traits::IpVersion;

/// Host denoting the zone apex
pub const APEX_HOST: &str = "@";

/// Host denoting a wildcard record
pub const WILDCARD_HOST: &str = "*";

/// Maximum number of characters kept from a response body in error messages
pub const MAX_BODY_SNAPSHOT: usize = 256;

/// Join host and domain into a fully-qualified name.
///
/// The wildcard host resolves to `any.<domain>` so the name is queryable.
pub fn build_domain_name(host: &str, domain: &str) -> String {
    match host {
        APEX_HOST => domain.to_string(),
        WILDCARD_HOST => format!("any.{}", domain),
        _ => format!("{}.{}", host, domain),
    }
}

/// One-line description of a configured record, used in logs
pub fn describe(domain: &str, host: &str, provider: &str, ip_version: IpVersion) -> String {
    format!(
        "[domain: {} | host: {} | provider: {} | ip: {}]",
        domain, host, provider, ip_version
    )
}

/// HTML anchor
pub fn link(href: &str, text: &str) -> String {
    format!("<a href=\"{}\">{}</a>", href, text)
}

/// Collapse a response body to a single bounded line.
///
/// Whitespace runs (including newlines) become one space and the result is
/// cut at [`MAX_BODY_SNAPSHOT`] characters.
pub fn body_to_single_line(body: &str) -> String {
    let line = body.split_whitespace().collect::<Vec<_>>().join(" ");

    if line.chars().count() <= MAX_BODY_SNAPSHOT {
        return line;
    }

    let mut truncated: String = line.chars().take(MAX_BODY_SNAPSHOT).collect();
    truncated.push_str("...");
    truncated
}
