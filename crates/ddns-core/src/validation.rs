//! Secret shape checks
//!
//! Adapters call these from their constructors so that a malformed secret
//! is rejected before an adapter value exists.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static NAMECHEAP_PASSWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9-]{16,64}$").expect("namecheap password pattern is valid")
});

/// Whether `password` has the shape of a Namecheap dynamic DNS password
pub fn is_namecheap_password(password: &str) -> bool {
    NAMECHEAP_PASSWORD.is_match(password)
}

/// Check a Namecheap dynamic DNS password
pub fn check_namecheap_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(Error::EmptyPassword);
    }
    if !is_namecheap_password(password) {
        return Err(Error::MalformedPassword);
    }
    Ok(())
}

/// Check a bearer token
pub fn check_token(token: &str) -> Result<()> {
    if token.trim().is_empty() {
        return Err(Error::EmptyToken);
    }
    Ok(())
}
