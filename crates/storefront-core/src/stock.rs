//! Out-of-stock handling for option values.
//!
//! After an option change the platform reports which attribute values are
//! still in stock and how the store wants the others shown.

use serde::{Deserialize, Serialize};

/// The subset of the option-change `data` payload this storefront reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductAttributesData {
    #[serde(default)]
    pub out_of_stock_behavior: Option<String>,
    #[serde(default)]
    pub in_stock_attributes: Vec<i64>,
    #[serde(default)]
    pub out_of_stock_message: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub instock: Option<bool>,
    #[serde(default)]
    pub purchasable: Option<bool>,
    #[serde(default)]
    pub stock: Option<i64>,
}

/// How one attribute value should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeAvailability {
    Available,
    Hidden,
    /// Still shown, with this suffix appended to its label.
    Labeled(String),
}

/// Plans the display of `attribute_ids` against `data`.
///
/// Only the `hide_option` and `label_option` behaviours act on the view;
/// for anything else an empty plan is returned and the view is left as is.
#[must_use]
pub fn attribute_availability(
    data: &ProductAttributesData,
    attribute_ids: &[i64],
) -> Vec<(i64, AttributeAvailability)> {
    let hide = match data.out_of_stock_behavior.as_deref() {
        Some("hide_option") => true,
        Some("label_option") => false,
        _ => return Vec::new(),
    };
    let suffix = format!(
        " ({})",
        data.out_of_stock_message.as_deref().unwrap_or_default()
    );

    attribute_ids
        .iter()
        .map(|&id| {
            let availability = if data.in_stock_attributes.contains(&id) {
                AttributeAvailability::Available
            } else if hide {
                AttributeAvailability::Hidden
            } else {
                AttributeAvailability::Labeled(suffix.clone())
            };
            (id, availability)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(behavior: &str) -> ProductAttributesData {
        ProductAttributesData {
            out_of_stock_behavior: Some(behavior.to_owned()),
            in_stock_attributes: vec![101, 103],
            out_of_stock_message: Some("Out of stock".to_owned()),
            ..ProductAttributesData::default()
        }
    }

    #[test]
    fn hide_option_hides_out_of_stock_values() {
        let plan = attribute_availability(&data("hide_option"), &[101, 102, 103]);
        assert_eq!(
            plan,
            [
                (101, AttributeAvailability::Available),
                (102, AttributeAvailability::Hidden),
                (103, AttributeAvailability::Available),
            ]
        );
    }

    #[test]
    fn label_option_appends_message() {
        let plan = attribute_availability(&data("label_option"), &[102]);
        assert_eq!(
            plan,
            [(102, AttributeAvailability::Labeled(" (Out of stock)".to_owned()))]
        );
    }

    #[test]
    fn other_behaviors_leave_view_untouched() {
        assert!(attribute_availability(&data("do_nothing"), &[102]).is_empty());
        assert!(attribute_availability(&ProductAttributesData::default(), &[102]).is_empty());
    }

    #[test]
    fn deserializes_platform_payload() {
        let json = serde_json::json!({
            "out_of_stock_behavior": "label_option",
            "in_stock_attributes": [101],
            "out_of_stock_message": "Sold out",
            "sku": "SNS-001",
            "instock": true,
            "purchasable": true,
            "stock": null,
            "price": { "without_tax": { "value": 12.0 } }
        });
        let parsed: ProductAttributesData = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.in_stock_attributes, [101]);
        assert_eq!(parsed.sku.as_deref(), Some("SNS-001"));
        assert!(parsed.stock.is_none());
    }
}
