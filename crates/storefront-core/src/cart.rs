//! The add-to-cart boundary consumed by the submitter.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::addon::AddonItem;
use crate::error::ItemSubmissionError;

/// One "add to cart" call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: i64,
    /// Remaining form fields (option selections) sent with the base item,
    /// in form order. Empty for add-ons.
    #[serde(default)]
    pub fields: Vec<(String, String)>,
}

impl AddToCartRequest {
    /// Request for the primary product, carrying the full product form.
    ///
    /// Fields with an empty value are dropped, matching how the browser
    /// omits empty file inputs from the submitted form.
    #[must_use]
    pub fn base(
        product_id: impl Into<String>,
        quantity: i64,
        fields: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            fields: fields.into_iter().filter(|(_, v)| !v.is_empty()).collect(),
        }
    }

    #[must_use]
    pub fn addon(item: &AddonItem) -> Self {
        Self {
            product_id: item.id.clone(),
            quantity: item.amount,
            fields: Vec::new(),
        }
    }

    /// Form-encoded body for the platform's cart add endpoint.
    #[must_use]
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form = Vec::with_capacity(self.fields.len() + 3);
        form.push(("action".to_owned(), "add".to_owned()));
        form.push(("product_id".to_owned(), self.product_id.clone()));
        form.push(("qty[]".to_owned(), self.quantity.to_string()));
        form.extend(
            self.fields
                .iter()
                .filter(|(k, _)| k != "action" && k != "product_id" && k != "qty[]")
                .cloned(),
        );
        form
    }
}

/// The cart line created by a successful call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemAdded {
    pub cart_item_id: Option<String>,
    pub cart_url: Option<String>,
}

/// Issues add-to-cart calls against the platform.
///
/// Both transport failures and error payloads come back as
/// [`ItemSubmissionError`].
pub trait CartApi {
    fn add_to_cart(
        &self,
        request: &AddToCartRequest,
    ) -> impl Future<Output = Result<CartItemAdded, ItemSubmissionError>> + Send;
}
