mod args;
mod cart;
mod product;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use storefront_client::StorefrontClient;
use storefront_core::AppConfig;
use tracing_subscriber::EnvFilter;

use crate::args::{parse_addon_arg, parse_key_value, AddonArg};

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Drive a storefront's cart and product endpoints from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve the variant descriptor for a set of option controls
    Variant {
        /// YAML or JSON file holding a list of option controls
        #[arg(long)]
        controls: PathBuf,
    },
    /// Add a product and its add-ons to the cart, one at a time
    Add {
        #[arg(long)]
        product_id: String,
        #[arg(long, default_value = "1")]
        qty: i64,
        /// Product form field sent with the base item (repeatable)
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
        /// Free add-on product id (added with amount 1)
        #[arg(long)]
        free_addon: Option<String>,
        /// Additional add-on as ID:AMOUNT (repeatable)
        #[arg(long = "addon", value_parser = parse_addon_arg)]
        addons: Vec<AddonArg>,
    },
    /// Print the total number of units in a cart
    CartQuantity {
        #[arg(long)]
        cart_id: String,
    },
    /// Remove a line from the cart
    Remove {
        #[arg(long)]
        item_id: String,
        /// Print the cart's refreshed quantity afterwards
        #[arg(long)]
        cart_id: Option<String>,
    },
    /// List the add-on offers configured for a product
    Addons {
        #[arg(long)]
        product_id: i64,
        /// Selected add-on as ID:AMOUNT, priced into the extra total (repeatable)
        #[arg(long = "select", value_parser = parse_addon_arg)]
        selections: Vec<AddonArg>,
    },
    /// Show which attribute values are in stock for a product form
    Stock {
        #[arg(long)]
        product_id: String,
        /// Product form field (repeatable)
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
        /// Attribute value id to evaluate (repeatable)
        #[arg(long = "attribute")]
        attributes: Vec<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Variant { controls }) => {
            init_tracing("info");
            product::run_variant(&controls)
        }
        Some(Commands::Add {
            product_id,
            qty,
            fields,
            free_addon,
            addons,
        }) => {
            let (_, client) = connect()?;
            cart::run_add(client, &product_id, qty, fields, free_addon, &addons).await
        }
        Some(Commands::CartQuantity { cart_id }) => {
            cart::run_cart_quantity(&connect()?.1, &cart_id).await
        }
        Some(Commands::Remove { item_id, cart_id }) => {
            cart::run_remove(&connect()?.1, &item_id, cart_id.as_deref()).await
        }
        Some(Commands::Addons {
            product_id,
            selections,
        }) => {
            let (config, client) = connect()?;
            product::run_addons(&client, product_id, &config.metafield_namespace, &selections)
                .await
        }
        Some(Commands::Stock {
            product_id,
            fields,
            attributes,
        }) => product::run_stock(&connect()?.1, &product_id, &fields, &attributes).await,
        None => {
            println!("storefront-cli: no command given; see --help");
            Ok(())
        }
    }
}

/// Builds the storefront client from configuration. Logging is installed at
/// the configured level first.
fn connect() -> anyhow::Result<(AppConfig, StorefrontClient)> {
    let config = storefront_core::load_app_config()?;
    init_tracing(&config.log_level);
    tracing::debug!(?config, "loaded configuration");
    let client = StorefrontClient::new(&config)?;
    Ok((config, client))
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests;
