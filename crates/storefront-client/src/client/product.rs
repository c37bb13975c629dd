//! Product attribute option change.

use reqwest::header::ACCEPT;

use super::{check_status, read_json, StorefrontClient};
use crate::error::ClientError;
use crate::types::OptionChangeResponse;

impl StorefrontClient {
    /// Posts the current product form to
    /// `/remote/v1/product-attributes/{product_id}` and returns the refreshed
    /// price/stock data together with the rendered template content.
    ///
    /// # Errors
    ///
    /// Returns a transport or deserialization error after retries.
    pub async fn option_change(
        &self,
        product_id: &str,
        form: &[(String, String)],
    ) -> Result<OptionChangeResponse, ClientError> {
        let url = self.endpoint(&format!("remote/v1/product-attributes/{product_id}"))?;
        let stencil_options =
            serde_json::json!({ "render_with": self.option_change_template }).to_string();

        self.retry.run("option change", || {
            let url = url.clone();
            let stencil_options = stencil_options.clone();
            async move {
                let response = self
                    .client
                    .post(url.clone())
                    .header(ACCEPT, "application/json")
                    .header("X-Requested-With", "XMLHttpRequest")
                    .header("stencil-options", stencil_options)
                    .form(form)
                    .send()
                    .await?;
                let response = check_status(response, &url)?;
                read_json(response, || format!("option change for product {product_id}")).await
            }
        })
        .await
    }
}
