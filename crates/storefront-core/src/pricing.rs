//! Extra price contributed by selected add-ons.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::addon::AddonItem;

/// An add-on product as offered on the product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonOffer {
    pub entity_id: i64,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub add_to_cart_url: Option<String>,
}

/// Sum of `price * amount` over `selected`.
///
/// Items without a matching offer add nothing.
#[must_use]
pub fn addon_total<'a>(
    offers: &[AddonOffer],
    selected: impl IntoIterator<Item = &'a AddonItem>,
) -> Decimal {
    let prices: HashMap<String, Decimal> = offers
        .iter()
        .map(|offer| (offer.entity_id.to_string(), offer.price))
        .collect();

    selected
        .into_iter()
        .filter_map(|item| match prices.get(&item.id) {
            Some(price) => Some(*price * Decimal::from(item.amount)),
            None => {
                tracing::debug!(product_id = %item.id, "no offer for selected add-on; not priced");
                None
            }
        })
        .sum()
}
