//! Request decoration helpers
//!
//! Each helper sets one header on an already-built [`reqwest::Request`].

use reqwest::Request;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue, USER_AGENT};

use crate::error::{Error, Result};

/// User agent sent to every vendor
pub const DEFAULT_USER_AGENT: &str = concat!("ddns/", env!("CARGO_PKG_VERSION"));

pub fn set_user_agent(request: &mut Request) {
    request
        .headers_mut()
        .insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
}

pub fn set_accept(request: &mut Request, mime: &'static str) {
    request
        .headers_mut()
        .insert(ACCEPT, HeaderValue::from_static(mime));
}

pub fn set_content_type(request: &mut Request, mime: &'static str) {
    request
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(mime));
}

/// Set `Authorization: Bearer <token>`.
///
/// The header is marked sensitive so it is hidden from `Debug` output.
pub fn set_auth_bearer(request: &mut Request, token: &str) -> Result<()> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| Error::request_build("token is not a valid header value"))?;
    value.set_sensitive(true);
    request.headers_mut().insert(AUTHORIZATION, value);
    Ok(())
}
