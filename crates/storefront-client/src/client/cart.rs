//! Cart writes and the cart quantity lookup.

use std::future::Future;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use storefront_core::{AddToCartRequest, CartApi, CartItemAdded, ItemSubmissionError};

use super::{check_status, read_json, StorefrontClient};
use crate::error::ClientError;
use crate::html::strip_html;
use crate::types::{CartAddResponse, CartUpdateResponse, StorefrontCart};

impl StorefrontClient {
    /// Adds one line to the session cart via `POST /remote/v1/cart/add`.
    ///
    /// Sent exactly once; never retried.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`]: the platform answered with `data.error`
    ///   (HTML stripped) or without a cart item.
    /// - [`ClientError::Http`], [`ClientError::UnexpectedStatus`],
    ///   [`ClientError::RateLimited`], [`ClientError::NotFound`]: transport
    ///   or HTTP-level failure.
    /// - [`ClientError::Deserialize`]: the body is not the expected JSON.
    pub async fn add_item(&self, request: &AddToCartRequest) -> Result<CartItemAdded, ClientError> {
        let url = self.endpoint("remote/v1/cart/add")?;
        tracing::debug!(product_id = %request.product_id, quantity = request.quantity, "cart add");

        let response = self
            .client
            .post(url.clone())
            .header(ACCEPT, "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&request.to_form())
            .send()
            .await?;
        let response = check_status(response, &url)?;
        let parsed: CartAddResponse = read_json(response, || {
            format!("cart add for product {}", request.product_id)
        })
        .await?;

        if let Some(error) = parsed.data.error.filter(|e| !e.trim().is_empty()) {
            return Err(ClientError::Api(strip_html(&error)));
        }
        let Some(item) = parsed.data.cart_item else {
            return Err(ClientError::Api(
                "cart add response carried no cart item".to_owned(),
            ));
        };

        Ok(CartItemAdded {
            cart_item_id: item.id.map(|id| match id {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            cart_url: item.cart_url,
        })
    }

    /// Removes a cart line by setting its quantity to zero.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with the platform's messages joined by
    /// newlines when the update is not reported as `"succeed"`, or a
    /// transport/deserialization error.
    pub async fn remove_item(&self, item_id: &str) -> Result<(), ClientError> {
        let url = self.endpoint("remote/v1/cart/update")?;
        let body = serde_json::json!({ "items": [{ "id": item_id, "quantity": 0 }] });

        let response = self
            .client
            .post(url.clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .body(body.to_string())
            .send()
            .await?;
        let response = check_status(response, &url)?;
        let parsed: CartUpdateResponse =
            read_json(response, || format!("cart update removing {item_id}")).await?;

        if parsed.data.status.as_deref() == Some("succeed") {
            tracing::info!(item_id, "removed cart item");
            return Ok(());
        }

        let message = if parsed.data.errors.is_empty() {
            "cart update did not succeed".to_owned()
        } else {
            parsed
                .data
                .errors
                .iter()
                .map(|e| strip_html(e))
                .collect::<Vec<_>>()
                .join("\n")
        };
        Err(ClientError::Api(message))
    }

    /// Total number of units in the cart.
    ///
    /// A cart that no longer exists (HTTP 404) counts as empty.
    ///
    /// # Errors
    ///
    /// Returns a transport or deserialization error after retries.
    pub async fn cart_quantity(&self, cart_id: &str) -> Result<u64, ClientError> {
        let url = self.endpoint(&format!("api/storefront/carts/{cart_id}"))?;

        let result = self.retry.run("cart quantity", || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .header(ACCEPT, "application/json")
                    .send()
                    .await?;
                let response = check_status(response, &url)?;
                let cart: StorefrontCart =
                    read_json(response, || format!("storefront cart {cart_id}")).await?;
                Ok(cart.line_items.total_quantity())
            }
        })
        .await;

        match result {
            Err(ClientError::NotFound { .. }) => {
                tracing::debug!(cart_id, "cart not found; treating quantity as 0");
                Ok(0)
            }
            other => other,
        }
    }
}

impl CartApi for StorefrontClient {
    fn add_to_cart(
        &self,
        request: &AddToCartRequest,
    ) -> impl Future<Output = Result<CartItemAdded, ItemSubmissionError>> + Send {
        async move {
            self.add_item(request).await.map_err(|err| match err {
                ClientError::Api(message) => {
                    ItemSubmissionError::application(&request.product_id, message)
                }
                other => ItemSubmissionError::transport(&request.product_id, other.to_string()),
            })
        }
    }
}
