//! Retry policy for the storefront's read-only calls (option change, cart
//! quantity, GraphQL).
//!
//! Cart writes never go through here: a retried add could put the same
//! line in the cart twice.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Longest single wait, including a server-requested `Retry-After`.
const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` for errors worth retrying after a back-off delay.
///
/// Retriable:
/// - [`ClientError::RateLimited`]: HTTP 429.
/// - [`ClientError::Http`]: timeout, connection failure, or 5xx.
/// - [`ClientError::UnexpectedStatus`] with a 5xx status.
///
/// Everything else is returned immediately.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::RateLimited { .. } => true,
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::UnexpectedStatus { status, .. } => *status >= 500,
        ClientError::Deserialize { .. }
        | ClientError::NotFound { .. }
        | ClientError::InvalidStoreUrl { .. }
        | ClientError::Api(_)
        | ClientError::GraphQl(_)
        | ClientError::MissingToken => false,
    }
}

/// How many times, and how patiently, a read-only call is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// Extra attempts after the first.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    /// Wait before retry number `retry` (1-based) after `err`.
    ///
    /// Exponential from `backoff_base_ms`, never shorter than the store's
    /// `Retry-After` on a 429, capped at 30 s. `jitter` scales the
    /// exponential part and is expected in `0.75..=1.25`.
    pub(crate) fn delay(&self, retry: u32, err: &ClientError, jitter: f64) -> Duration {
        let exponential = self
            .backoff_base_ms
            .saturating_mul(1u64 << retry.saturating_sub(1).min(10));
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let jittered = (exponential as f64 * jitter) as u64;
        let requested = match err {
            ClientError::RateLimited {
                retry_after_secs, ..
            } => retry_after_secs.saturating_mul(1000),
            _ => 0,
        };
        Duration::from_millis(jittered.max(requested).min(MAX_DELAY_MS))
    }

    /// Runs `operation`, repeating it on transient errors. `call` names the
    /// endpoint in log lines.
    pub(crate) async fn run<T, F, Fut>(&self, call: &str, mut operation: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut retry = 0u32;
        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if !is_retriable(&err) || retry >= self.max_retries {
                if retry > 0 {
                    tracing::warn!(call, attempts = retry + 1, error = %err, "storefront call gave up");
                }
                return Err(err);
            }
            retry += 1;
            let delay = self.delay(retry, &err, rand::random::<f64>() * 0.5 + 0.75);
            tracing::warn!(
                call,
                retry,
                max_retries = self.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "read-only storefront call failed; retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
