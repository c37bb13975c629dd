//! GraphQL storefront queries for add-on products and product metafields.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use storefront_core::AddonOffer;

use crate::client::{check_status, read_json, StorefrontClient};
use crate::error::ClientError;
use crate::types::{
    AddonCatalog, GraphQlResponse, ProductMeta, ProductSite, ProductsSite, SiteData,
};

const PRODUCTS_QUERY: &str = r"
query productQuery($ids: [Int!], $first: Int) {
  site {
    products(entityIds: $ids, first: $first) {
      edges {
        node {
          entityId
          name
          addToCartUrl
          prices { price { currencyCode value } }
        }
      }
    }
  }
}";

const METAFIELDS_QUERY: &str = r"
query metafieldQuery($productId: Int!, $namespace: String!) {
  site {
    product(entityId: $productId) {
      entityId
      name
      metafields(namespace: $namespace) {
        edges { node { entityId key value } }
      }
      variants {
        edges {
          node {
            entityId
            sku
            height { value unit }
            width { value unit }
            depth { value unit }
            options {
              edges {
                node {
                  displayName
                  values { edges { node { label } } }
                }
              }
            }
            metafields(namespace: $namespace) {
              edges { node { entityId key value } }
            }
          }
        }
      }
    }
  }
}";

impl StorefrontClient {
    /// Runs one GraphQL query against `/graphql` with the bearer token.
    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
        context: &str,
    ) -> Result<T, ClientError> {
        let token = self.api_token.as_deref().ok_or(ClientError::MissingToken)?;
        let url = self.endpoint("graphql")?;
        let body = serde_json::json!({ "query": query, "variables": variables }).to_string();

        let envelope: GraphQlResponse<T> =
            self.retry.run(context, || {
                let url = url.clone();
                let body = body.clone();
                async move {
                    let response = self
                        .client
                        .post(url.clone())
                        .header(ACCEPT, "application/json")
                        .header(AUTHORIZATION, format!("Bearer {token}"))
                        .header(reqwest::header::CONTENT_TYPE, "application/json")
                        .body(body)
                        .send()
                        .await?;
                    let response = check_status(response, &url)?;
                    read_json(response, || context.to_owned()).await
                }
            })
            .await?;

        if !envelope.errors.is_empty() {
            let messages: Vec<&str> = envelope.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(ClientError::GraphQl(messages.join("; ")));
        }
        envelope
            .data
            .ok_or_else(|| ClientError::GraphQl(format!("{context}: response carried no data")))
    }

    /// Name, price and add-to-cart URL for each of `entity_ids`.
    ///
    /// An empty id list returns an empty list without a request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingToken`] without a token, or a
    /// transport/GraphQL/deserialization error.
    pub async fn product_info(&self, entity_ids: &[i64]) -> Result<Vec<AddonOffer>, ClientError> {
        if entity_ids.is_empty() {
            return Ok(Vec::new());
        }
        let data: SiteData<ProductsSite> = self
            .graphql(
                PRODUCTS_QUERY,
                serde_json::json!({ "ids": entity_ids, "first": entity_ids.len() }),
                "products query",
            )
            .await?;

        Ok(data
            .site
            .products
            .edges
            .into_iter()
            .map(|edge| edge.node.into_offer())
            .collect())
    }

    /// Product and variant metafields in `namespace`, plus variant
    /// dimensions and option labels.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::GraphQl`] if the product does not exist, or
    /// any error from the underlying query.
    pub async fn product_metafields(
        &self,
        product_id: i64,
        namespace: &str,
    ) -> Result<ProductMeta, ClientError> {
        let data: SiteData<ProductSite> = self
            .graphql(
                METAFIELDS_QUERY,
                serde_json::json!({ "productId": product_id, "namespace": namespace }),
                "metafield query",
            )
            .await?;

        data.site
            .product
            .map(ProductMeta::from)
            .ok_or_else(|| ClientError::GraphQl(format!("product {product_id} not found")))
    }

    /// Loads the add-on offers configured for a product page.
    ///
    /// The metafields are fetched first; the free and additional add-on
    /// product lists are then fetched concurrently.
    ///
    /// # Errors
    ///
    /// Propagates the first error from any of the three queries.
    pub async fn load_addon_catalog(
        &self,
        product_id: i64,
        namespace: &str,
    ) -> Result<AddonCatalog, ClientError> {
        let meta = self.product_metafields(product_id, namespace).await?;
        let free_ids = meta.free_add_on_ids();
        let additional_ids = meta.additional_add_on_ids();

        let (free, additional) = tokio::try_join!(
            self.product_info(&free_ids),
            self.product_info(&additional_ids)
        )?;

        tracing::debug!(
            product_id,
            free = free.len(),
            additional = additional.len(),
            variants = meta.variants.len(),
            "loaded add-on catalog"
        );

        Ok(AddonCatalog {
            free,
            additional,
            free_add_on_count: meta.free_add_on_count(),
            variants: meta.variants,
        })
    }
}
