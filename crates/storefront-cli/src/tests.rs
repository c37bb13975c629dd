use super::*;
use crate::args::{parse_addon_arg, parse_key_value, AddonArg};
use crate::cart::selection_from_args;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["storefront-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_variant_command() {
    let cli = Cli::try_parse_from(["storefront-cli", "variant", "--controls", "form.yaml"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Variant { ref controls }) if controls == &PathBuf::from("form.yaml")
    ));
}

#[test]
fn parses_add_with_fields_and_addons() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "add",
        "--product-id",
        "77",
        "--qty",
        "2",
        "--field",
        "attribute[12]=41",
        "--free-addon",
        "501",
        "--addon",
        "610:2",
        "--addon",
        "611",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Add {
        product_id,
        qty,
        fields,
        free_addon,
        addons,
    }) = cli.command
    else {
        panic!("expected add command");
    };
    assert_eq!(product_id, "77");
    assert_eq!(qty, 2);
    assert_eq!(fields, [("attribute[12]".to_owned(), "41".to_owned())]);
    assert_eq!(free_addon.as_deref(), Some("501"));
    assert_eq!(
        addons,
        [
            AddonArg { id: "610".to_owned(), amount: 2 },
            AddonArg { id: "611".to_owned(), amount: 1 },
        ]
    );
}

#[test]
fn add_qty_defaults_to_one() {
    let cli = Cli::try_parse_from(["storefront-cli", "add", "--product-id", "77"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Add { qty: 1, ref addons, .. }) if addons.is_empty()
    ));
}

#[test]
fn add_rejects_malformed_addon() {
    let result = Cli::try_parse_from([
        "storefront-cli",
        "add",
        "--product-id",
        "77",
        "--addon",
        "610:lots",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_remove_with_optional_cart() {
    let cli = Cli::try_parse_from(["storefront-cli", "remove", "--item-id", "line-1"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Remove { ref item_id, cart_id: None }) if item_id == "line-1"
    ));

    let cli = Cli::try_parse_from([
        "storefront-cli",
        "remove",
        "--item-id",
        "line-1",
        "--cart-id",
        "cart-9",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Remove { cart_id: Some(ref c), .. }) if c == "cart-9"
    ));
}

#[test]
fn parses_cart_quantity() {
    let cli = Cli::try_parse_from(["storefront-cli", "cart-quantity", "--cart-id", "cart-9"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::CartQuantity { ref cart_id }) if cart_id == "cart-9"
    ));
}

#[test]
fn addons_requires_numeric_product_id() {
    assert!(Cli::try_parse_from(["storefront-cli", "addons", "--product-id", "abc"]).is_err());

    let cli = Cli::try_parse_from([
        "storefront-cli",
        "addons",
        "--product-id",
        "77",
        "--select",
        "610:3",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Addons { product_id: 77, ref selections }) if selections.len() == 1
    ));
}

#[test]
fn parses_stock_attributes() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "stock",
        "--product-id",
        "77",
        "--field",
        "attribute[12]=41",
        "--attribute",
        "41",
        "--attribute",
        "42",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Stock { ref attributes, ref fields, .. })
            if attributes == &[41, 42] && fields.len() == 1
    ));
}

#[test]
fn key_value_keeps_empty_and_nested_values() {
    assert_eq!(parse_key_value("note=").unwrap(), ("note".to_owned(), String::new()));
    assert_eq!(
        parse_key_value("q=a=b").unwrap(),
        ("q".to_owned(), "a=b".to_owned())
    );
    assert!(parse_key_value("novalue").is_err());
    assert!(parse_key_value("=x").is_err());
}

#[test]
fn addon_arg_rejects_empty_id() {
    assert!(parse_addon_arg(":2").is_err());
    assert_eq!(
        parse_addon_arg(" 610 : 4 ").unwrap(),
        AddonArg { id: "610".to_owned(), amount: 4 }
    );
}

#[test]
fn selection_from_args_queues_free_addon_first() {
    let selection = selection_from_args(
        Some("501".to_owned()),
        &[AddonArg { id: "610".to_owned(), amount: 2 }],
    );
    let queue = storefront_core::AddonQueue::from_selection(&selection).unwrap();
    let ids: Vec<(&str, i64)> = queue.iter().map(|i| (i.id.as_str(), i.amount)).collect();
    assert_eq!(ids, [("501", 1), ("610", 2)]);
}

#[test]
fn load_controls_reads_json_file() {
    let path = std::env::temp_dir().join(format!("storefront-cli-controls-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"[{"id":"attribute_9","kind":"input-checkbox","label":"Gift wrap","value":{"checkbox":true}}]"#,
    )
    .unwrap();

    let controls = crate::product::load_controls(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let descriptor = storefront_core::resolve(&controls);
    assert_eq!(descriptor.display().as_deref(), Some("Gift wrap:Yes"));
}
