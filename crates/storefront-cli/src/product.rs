//! Product command handlers: variant resolution, add-on catalog and stock.

use std::path::Path;

use anyhow::Context;
use storefront_client::StorefrontClient;
use storefront_core::{
    addon_total, attribute_availability, resolve, AddonItem, AddonQueue, AttributeAvailability,
    OptionControl, UNSATISFIED,
};

use crate::args::AddonArg;

/// Reads option controls from a `.json` file, or YAML for any other
/// extension.
pub(crate) fn load_controls(path: &Path) -> anyhow::Result<Vec<OptionControl>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read controls from {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let controls = if is_json {
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON controls in {}", path.display()))?
    } else {
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse YAML controls in {}", path.display()))?
    };
    Ok(controls)
}

/// Prints the display string and the `data-variant` attribute value for the
/// controls in `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub(crate) fn run_variant(path: &Path) -> anyhow::Result<()> {
    let controls = load_controls(path)?;
    let descriptor = resolve(&controls);

    match descriptor.display() {
        Some(display) => println!("variant   {display}"),
        None => println!("variant   {UNSATISFIED} (required options missing)"),
    }
    println!("attribute {}", descriptor.attribute_value());
    Ok(())
}

/// Lists the free and additional add-on offers for `product_id`, then the
/// extra price of `selections`.
///
/// # Errors
///
/// Returns an error if any catalog query fails or a selection is invalid.
pub(crate) async fn run_addons(
    client: &StorefrontClient,
    product_id: i64,
    namespace: &str,
    selections: &[AddonArg],
) -> anyhow::Result<()> {
    let catalog = client.load_addon_catalog(product_id, namespace).await?;

    if catalog.shows_free_section() {
        let allowed = catalog
            .free_add_on_count
            .map_or_else(|| "any".to_owned(), |n| n.to_string());
        println!("free add-ons (choose {allowed}):");
        for offer in &catalog.free {
            println!("  {:<8}{}", offer.entity_id, offer.name);
        }
    }
    if catalog.shows_additional_section() {
        println!("additional add-ons:");
        for offer in &catalog.additional {
            println!("  {:<8}{:<40}{:>10}", offer.entity_id, offer.name, offer.price);
        }
    }
    if !catalog.shows_free_section() && !catalog.shows_additional_section() {
        println!("no add-ons configured for product {product_id}");
    }

    for variant in &catalog.variants {
        let options: Vec<String> = variant
            .options
            .iter()
            .map(|(name, label)| format!("{name}={label}"))
            .collect();
        println!(
            "variant {} sku={} {}",
            variant.entity_id,
            variant.sku.as_deref().unwrap_or("-"),
            options.join(" ")
        );
    }

    if !selections.is_empty() {
        let mut selected = AddonQueue::new();
        for arg in selections {
            selected.append(AddonItem::new(arg.id.clone(), arg.amount))?;
        }
        let offers: Vec<_> = catalog
            .free
            .iter()
            .chain(&catalog.additional)
            .cloned()
            .collect();
        println!("extra price {}", addon_total(&offers, selected.iter()));
    }
    Ok(())
}

/// Posts `fields` as the product form and prints the availability of each
/// attribute in `attributes`.
///
/// # Errors
///
/// Returns an error if the option-change request fails.
pub(crate) async fn run_stock(
    client: &StorefrontClient,
    product_id: &str,
    fields: &[(String, String)],
    attributes: &[i64],
) -> anyhow::Result<()> {
    let response = client.option_change(product_id, fields).await?;
    let data = &response.data;

    println!(
        "sku={} instock={} purchasable={} stock={}",
        data.sku.as_deref().unwrap_or("-"),
        data.instock.map_or_else(|| "-".to_owned(), |v| v.to_string()),
        data.purchasable.map_or_else(|| "-".to_owned(), |v| v.to_string()),
        data.stock.map_or_else(|| "-".to_owned(), |v| v.to_string()),
    );

    let plan = attribute_availability(data, attributes);
    if plan.is_empty() {
        println!(
            "behaviour {} leaves attribute display unchanged",
            data.out_of_stock_behavior.as_deref().unwrap_or("-")
        );
    }
    for (id, availability) in plan {
        match availability {
            AttributeAvailability::Available => println!("  {id:<8}available"),
            AttributeAvailability::Hidden => println!("  {id:<8}hidden"),
            AttributeAvailability::Labeled(suffix) => println!("  {id:<8}labeled{suffix}"),
        }
    }
    Ok(())
}
