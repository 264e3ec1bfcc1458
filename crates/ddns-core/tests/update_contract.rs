//! Contract Test: Update Verification
//!
//! Constraints verified:
//! - Success carries exactly the requested IP
//! - A differing vendor answer is a mismatch, never a success
//! - Repeated updates with the same input give the same output
//! - One adapter instance serves concurrent callers
//!
//! If this test fails, callers may record an IP the vendor does not hold.

mod common;

use common::*;
use ddns_core::{DnsProvider, ErrorKind, IpVersion};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn success_returns_requested_ip() {
    let provider = StubProvider::new(&json!({}), "example.com", "www", IpVersion::V4).unwrap();

    let result = provider
        .update(&CancellationToken::new(), &Client::new(), ip("203.0.113.5"))
        .await
        .unwrap();

    assert_eq!(result, ip("203.0.113.5"));
    assert_eq!(provider.update_call_count(), 1);
}

#[tokio::test]
async fn differing_answer_is_mismatch() {
    let provider = StubProvider::new(
        &json!({ "echo": "198.51.100.1" }),
        "example.org",
        "api",
        IpVersion::V4,
    )
    .unwrap();

    let err = provider
        .update(&CancellationToken::new(), &Client::new(), ip("198.51.100.9"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IpReceivedMismatch);
    assert!(!err.kind().is_configuration());
    assert_eq!(
        err.to_string(),
        "IP address received 198.51.100.1 does not match IP address sent 198.51.100.9"
    );
}

#[tokio::test]
async fn repeated_update_is_idempotent() {
    let provider = StubProvider::new(&json!({}), "example.com", "@", IpVersion::V4).unwrap();
    let cancel = CancellationToken::new();
    let client = Client::new();

    let first = provider.update(&cancel, &client, ip("203.0.113.5")).await.unwrap();
    let second = provider.update(&cancel, &client, ip("203.0.113.5")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.update_call_count(), 2);
}

#[tokio::test]
async fn shared_adapter_serves_concurrent_callers() {
    let provider = Arc::new(
        StubProvider::new(&json!({ "delay_ms": 10 }), "example.com", "www", IpVersion::V4).unwrap(),
    );
    let client = Client::new();
    let cancel = CancellationToken::new();

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let provider = Arc::clone(&provider);
        let client = client.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move { provider.update(&cancel, &client, ip("203.0.113.5")).await });
    }

    while let Some(joined) = tasks.join_next().await {
        assert_eq!(joined.unwrap().unwrap(), ip("203.0.113.5"));
    }
    assert_eq!(provider.update_call_count(), 8);
}
