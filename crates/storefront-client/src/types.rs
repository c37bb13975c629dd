//! Response shapes for the storefront endpoints.
//!
//! ### `/remote/v1/cart/add`
//! Always answers 200. Success carries `data.cart_item` with an `id` and
//! usually a `cart_url`; failure carries `data.error`, an HTML fragment
//! such as `"<p>We don't have enough ...</p>"`.
//!
//! ### `/remote/v1/cart/update`
//! `data.status` is `"succeed"` on success, otherwise `data.errors` lists
//! human-readable messages.
//!
//! ### `/api/storefront/carts/{id}`
//! camelCase JSON. Line items are split into `physicalItems`,
//! `digitalItems`, `customItems` (each with `quantity`) and
//! `giftCertificates` (each counts as one).
//!
//! ### `/graphql`
//! Relay-style `edges[].node` lists. Product prices arrive as JSON numbers
//! and are converted to `Decimal` through their decimal text so `19.99`
//! stays `19.99`.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use storefront_core::{AddonOffer, ProductAttributesData};

// ---------------------------------------------------------------------------
// Remote cart endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct CartAddResponse {
    #[serde(default)]
    pub data: CartAddData,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CartAddData {
    #[serde(default)]
    pub cart_item: Option<CartItemPayload>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CartItemPayload {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub cart_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CartUpdateResponse {
    #[serde(default)]
    pub data: CartUpdateData,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CartUpdateData {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Body of a product-attributes option change.
#[derive(Debug, Default, Deserialize)]
pub struct OptionChangeResponse {
    #[serde(default)]
    pub data: ProductAttributesData,
    /// Rendered template fragments, passed through untouched.
    #[serde(default)]
    pub content: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Storefront cart API
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StorefrontCart {
    #[serde(default)]
    pub line_items: LineItems,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LineItems {
    #[serde(default)]
    pub physical_items: Vec<QuantityItem>,
    #[serde(default)]
    pub digital_items: Vec<QuantityItem>,
    #[serde(default)]
    pub custom_items: Vec<QuantityItem>,
    #[serde(default)]
    pub gift_certificates: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuantityItem {
    #[serde(default)]
    pub quantity: u64,
}

impl LineItems {
    pub(crate) fn total_quantity(&self) -> u64 {
        let counted: u64 = self
            .physical_items
            .iter()
            .chain(&self.digital_items)
            .chain(&self.custom_items)
            .map(|item| item.quantity)
            .sum();
        counted + self.gift_certificates.len() as u64
    }
}

// ---------------------------------------------------------------------------
// GraphQL
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlErrorEntry {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SiteData<T> {
    pub site: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsSite {
    pub products: Connection<ProductNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductNode {
    pub entity_id: i64,
    pub name: String,
    #[serde(default)]
    pub add_to_cart_url: Option<String>,
    #[serde(default)]
    pub prices: Option<Prices>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Prices {
    pub price: Money,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Money {
    pub value: serde_json::Number,
}

impl ProductNode {
    pub(crate) fn into_offer(self) -> AddonOffer {
        let price = self
            .prices
            .and_then(|p| Decimal::from_str(&p.price.value.to_string()).ok())
            .unwrap_or_else(|| {
                tracing::warn!(entity_id = self.entity_id, "product has no usable price; using 0");
                Decimal::ZERO
            });
        AddonOffer {
            entity_id: self.entity_id,
            name: self.name,
            price,
            add_to_cart_url: self.add_to_cart_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductSite {
    pub product: Option<MetaProductNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetaProductNode {
    pub entity_id: i64,
    #[serde(default)]
    pub metafields: Connection<MetafieldNode>,
    #[serde(default)]
    pub variants: Connection<VariantNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetafieldNode {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VariantNode {
    pub entity_id: i64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub height: Option<Measurement>,
    #[serde(default)]
    pub width: Option<Measurement>,
    #[serde(default)]
    pub depth: Option<Measurement>,
    #[serde(default)]
    pub options: Connection<VariantOptionNode>,
    #[serde(default)]
    pub metafields: Connection<MetafieldNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Measurement {
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VariantOptionNode {
    pub display_name: String,
    #[serde(default)]
    pub values: Connection<OptionValueNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OptionValueNode {
    pub label: String,
}

fn metafield_map(connection: Connection<MetafieldNode>) -> BTreeMap<String, String> {
    connection
        .edges
        .into_iter()
        .map(|edge| (edge.node.key, edge.node.value))
        .collect()
}

impl From<VariantNode> for ProductVariantInfo {
    fn from(node: VariantNode) -> Self {
        let unit = node.height.as_ref().and_then(|h| h.unit.clone());
        let options = node
            .options
            .edges
            .into_iter()
            .filter_map(|edge| {
                let first = edge.node.values.edges.into_iter().next()?;
                Some((edge.node.display_name, first.node.label))
            })
            .collect();
        Self {
            entity_id: node.entity_id,
            sku: node.sku,
            height: node.height.map(|m| m.value),
            width: node.width.map(|m| m.value),
            depth: node.depth.map(|m| m.value),
            unit,
            metafields: metafield_map(node.metafields),
            options,
        }
    }
}

impl From<MetaProductNode> for ProductMeta {
    fn from(node: MetaProductNode) -> Self {
        Self {
            entity_id: node.entity_id,
            fields: metafield_map(node.metafields),
            variants: node.variants.edges.into_iter().map(|e| e.node.into()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public results
// ---------------------------------------------------------------------------

/// A variant with its dimensions, metafields and the first value label of
/// each option.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductVariantInfo {
    pub entity_id: i64,
    pub sku: Option<String>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub depth: Option<f64>,
    /// Unit reported with the height.
    pub unit: Option<String>,
    pub metafields: BTreeMap<String, String>,
    /// Option display name to value label.
    pub options: BTreeMap<String, String>,
}

/// Product-level metafields in the configured namespace plus variant info.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductMeta {
    pub entity_id: i64,
    pub fields: BTreeMap<String, String>,
    pub variants: Vec<ProductVariantInfo>,
}

impl ProductMeta {
    /// Entity ids listed in the `free_add_ons` metafield.
    #[must_use]
    pub fn free_add_on_ids(&self) -> Vec<i64> {
        self.id_list("free_add_ons")
    }

    /// Entity ids listed in the `additional_add_ons` metafield.
    #[must_use]
    pub fn additional_add_on_ids(&self) -> Vec<i64> {
        self.id_list("additional_add_ons")
    }

    #[must_use]
    pub fn free_add_on_count(&self) -> Option<u32> {
        self.fields
            .get("free_add_on_count")
            .and_then(|v| v.trim().parse().ok())
    }

    fn id_list(&self, key: &str) -> Vec<i64> {
        let Some(raw) = self.fields.get(key) else {
            return Vec::new();
        };
        raw.trim_matches(|c| c == '[' || c == ']')
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| match s.parse::<i64>() {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!(key, value = s, error = %e, "skipping non-numeric add-on id");
                    None
                }
            })
            .collect()
    }
}

/// Add-on products configured for a product page.
#[derive(Debug, Clone, PartialEq)]
pub struct AddonCatalog {
    pub free: Vec<AddonOffer>,
    pub additional: Vec<AddonOffer>,
    pub free_add_on_count: Option<u32>,
    pub variants: Vec<ProductVariantInfo>,
}

impl AddonCatalog {
    /// The free add-on section is hidden when no free add-ons are listed or
    /// the allowed count is zero.
    #[must_use]
    pub fn shows_free_section(&self) -> bool {
        !self.free.is_empty() && self.free_add_on_count != Some(0)
    }

    #[must_use]
    pub fn shows_additional_section(&self) -> bool {
        !self.additional.is_empty()
    }
}
