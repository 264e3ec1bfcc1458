//! Round-trip helpers shared by adapters
//!
//! Adapters build and decorate their own requests; these helpers run them on
//! the caller's client under the caller's cancellation token.

use std::future::Future;

use reqwest::{Client, Request};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::format::body_to_single_line;

/// Run `fut` until it completes or `cancel` fires.
///
/// An already-cancelled token wins over a ready future.
pub async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = fut => result,
    }
}

/// Send `request` and return the body of a 2xx response.
///
/// Any other status becomes [`Error::BadHttpStatus`] with a one-line body
/// snapshot.
pub async fn execute(cancel: &CancellationToken, client: &Client, request: Request) -> Result<String> {
    cancellable(cancel, async {
        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!("Sending {} {}", method, path);

        // Query strings may carry secrets; keep URLs out of error messages
        let response = client
            .execute(request)
            .await
            .map_err(|e| Error::Transport(e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.without_url()))?;

        if !status.is_success() {
            tracing::debug!("{} {} answered {}", method, path, status);
            return Err(Error::BadHttpStatus {
                status: status.as_u16(),
                body: body_to_single_line(&body),
            });
        }

        Ok(body)
    })
    .await
}
