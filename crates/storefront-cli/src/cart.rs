//! Cart command handlers: the submission chain, quantity lookup and
//! line removal.

use storefront_client::StorefrontClient;
use storefront_core::{
    AddToCartRequest, AddonLine, AddonQueue, AddonSelection, CartSubmissionOutcome, CartSubmitter,
};

use crate::args::AddonArg;

/// Builds the add-on selection the product page would capture from `free_addon`
/// and `addons`. Every listed add-on counts as checked.
pub(crate) fn selection_from_args(free_addon: Option<String>, addons: &[AddonArg]) -> AddonSelection {
    AddonSelection {
        free_addon,
        lines: addons
            .iter()
            .map(|arg| AddonLine {
                entity_id: arg.id.clone(),
                checked: true,
                counter: arg.amount.to_string(),
            })
            .collect(),
    }
}

/// Adds the base product and then each add-on, printing one line per item.
///
/// # Errors
///
/// Returns an error if an add-on argument is invalid or the base item was
/// rejected. Failed add-ons are reported but do not fail the command.
pub(crate) async fn run_add(
    client: StorefrontClient,
    product_id: &str,
    qty: i64,
    fields: Vec<(String, String)>,
    free_addon: Option<String>,
    addons: &[AddonArg],
) -> anyhow::Result<()> {
    let queue = AddonQueue::from_selection(&selection_from_args(free_addon, addons))?;
    let base = AddToCartRequest::base(product_id, qty, fields);

    let submitter = CartSubmitter::new(client);
    let outcome = submitter.submit(&base, queue).await;
    print_outcome(&outcome);

    if let Some(aborted) = outcome.chain_aborted() {
        anyhow::bail!("{aborted}");
    }
    Ok(())
}

fn print_outcome(outcome: &CartSubmissionOutcome) {
    println!("attempt {}", outcome.attempt_id);
    match &outcome.base {
        Ok(added) => println!(
            "  base     ok      line {}",
            added.cart_item_id.as_deref().unwrap_or("-")
        ),
        Err(aborted) => println!("  base     FAILED  {}", aborted.base.message),
    }
    for result in &outcome.addon_results {
        match &result.result {
            Ok(added) => println!(
                "  add-on   ok      {} x{} line {}",
                result.item.id,
                result.item.amount,
                added.cart_item_id.as_deref().unwrap_or("-")
            ),
            Err(err) => println!(
                "  add-on   FAILED  {} x{}: {}",
                result.item.id, result.item.amount, err.message
            ),
        }
    }
    for item in &outcome.discarded {
        println!("  add-on   SKIPPED {} x{} (superseded)", item.id, item.amount);
    }
    if outcome.base_succeeded() {
        println!("redirect {}", outcome.redirect_url("/cart.php"));
    }
}

/// Prints the total number of units in `cart_id`.
///
/// # Errors
///
/// Returns an error if the cart lookup fails.
pub(crate) async fn run_cart_quantity(client: &StorefrontClient, cart_id: &str) -> anyhow::Result<()> {
    let quantity = client.cart_quantity(cart_id).await?;
    println!("{quantity}");
    Ok(())
}

/// Removes `item_id` and, when a cart id is given, prints the refreshed quantity.
///
/// # Errors
///
/// Returns an error if the removal is rejected or the quantity lookup fails.
pub(crate) async fn run_remove(
    client: &StorefrontClient,
    item_id: &str,
    cart_id: Option<&str>,
) -> anyhow::Result<()> {
    client.remove_item(item_id).await?;
    println!("removed {item_id}");
    if let Some(cart_id) = cart_id {
        let quantity = client.cart_quantity(cart_id).await?;
        println!("cart quantity {quantity}");
    }
    Ok(())
}
