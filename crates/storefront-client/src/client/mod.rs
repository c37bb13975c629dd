//! HTTP client for the storefront's remote cart, product attribute,
//! storefront cart and GraphQL endpoints.

mod cart;
mod product;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use storefront_core::AppConfig;

use crate::error::ClientError;
use crate::retry::RetryPolicy;

/// Client bound to one storefront origin.
///
/// Read-only calls (option change, cart quantity, GraphQL) retry transient
/// failures with jittered exponential back-off. Cart writes are sent once.
pub struct StorefrontClient {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) api_token: Option<String>,
    pub(crate) retry: RetryPolicy,
    pub(crate) option_change_template: String,
}

impl StorefrontClient {
    /// Builds a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ClientError::InvalidStoreUrl`] if `store_url` does not
    /// parse.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        let mut client = Self::with_base_url(
            &config.store_url,
            config.storefront_api_token.as_deref(),
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )?;
        client
            .option_change_template
            .clone_from(&config.option_change_template);
        Ok(client)
    }

    /// Builds a client for an explicit origin (a wiremock server in tests).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ClientError::InvalidStoreUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        base_url: &str,
        api_token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidStoreUrl {
            store_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidStoreUrl {
                store_url: base_url.to_owned(),
                reason: format!("unsupported scheme \"{}\"", parsed.scheme()),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            api_token: api_token.map(str::to_owned),
            retry: RetryPolicy {
                max_retries,
                backoff_base_ms,
            },
            option_change_template: "products/bulk-discount-rates".to_owned(),
        })
    }

    /// Resolves `path` (no leading slash) against the store origin.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidStoreUrl {
                store_url: self.base_url.to_string(),
                reason: format!("cannot join \"{path}\": {e}"),
            })
    }
}

/// Maps non-2xx responses to typed errors.
pub(crate) fn check_status(response: Response, url: &Url) -> Result<Response, ClientError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(ClientError::RateLimited {
            host: url.host_str().unwrap_or_default().to_owned(),
            retry_after_secs,
        });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound {
            url: url.to_string(),
        });
    }

    if !status.is_success() {
        return Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(response)
}

/// Reads the body as text and deserializes it, naming `context` on failure.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: Response,
    context: impl FnOnce() -> String,
) -> Result<T, ClientError> {
    let body = response.text().await?;
    serde_json::from_str::<T>(&body).map_err(|e| ClientError::Deserialize {
        context: context(),
        source: e,
    })
}
