//! Integration tests for `StorefrontClient` using wiremock HTTP mocks.
//!
//! Each test stands up its own `MockServer`; no real network traffic is made.

use serde_json::json;
use storefront_client::{ClientError, StorefrontClient};
use storefront_core::{
    AddToCartRequest, AddonItem, AddonQueue, CartSubmitter, FailureKind,
};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> StorefrontClient {
    StorefrontClient::with_base_url(base_url, Some("test-token"), 5, "storefront-test/0.1", 0, 0)
        .expect("client construction should not fail")
}

fn test_client_with_retries(base_url: &str, max_retries: u32) -> StorefrontClient {
    StorefrontClient::with_base_url(base_url, Some("test-token"), 5, "storefront-test/0.1", max_retries, 0)
        .expect("client construction should not fail")
}

fn cart_item_json(id: &str) -> serde_json::Value {
    json!({
        "data": {
            "cart_item": {
                "id": id,
                "cart_url": "https://shop.example.com/cart.php"
            }
        }
    })
}

fn addon_request(id: &str, amount: i64) -> AddToCartRequest {
    AddToCartRequest::addon(&AddonItem::new(id, amount))
}

// ---------------------------------------------------------------------------
// Cart add
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_item_posts_form_and_returns_cart_item() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote/v1/cart/add"))
        .and(body_string_contains("action=add"))
        .and(body_string_contains("product_id=610"))
        .and(body_string_contains("qty%5B%5D=3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_item_json("line-1")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let added = client
        .add_item(&addon_request("610", 3))
        .await
        .expect("add should succeed");

    assert_eq!(added.cart_item_id.as_deref(), Some("line-1"));
    assert_eq!(
        added.cart_url.as_deref(),
        Some("https://shop.example.com/cart.php")
    );
}

#[tokio::test]
async fn add_item_surfaces_error_payload_as_plain_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote/v1/cart/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "error": "<p>We don't have enough <strong>Clay Saucer</strong> in stock.</p>" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.add_item(&addon_request("610", 1)).await.unwrap_err();

    match err {
        ClientError::Api(message) => {
            assert_eq!(message, "We don't have enough Clay Saucer in stock.");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn add_item_is_not_retried_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote/v1/cart/add"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_retries(&server.uri(), 3);
    let err = client.add_item(&addon_request("610", 1)).await.unwrap_err();

    assert!(
        matches!(err, ClientError::UnexpectedStatus { status: 503, .. }),
        "expected UnexpectedStatus(503), got: {err:?}"
    );
}

#[tokio::test]
async fn add_item_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote/v1/cart/add"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.add_item(&addon_request("610", 1)).await.unwrap_err();
    assert!(matches!(err, ClientError::Deserialize { .. }));
}

// ---------------------------------------------------------------------------
// Submission chain through the real client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submitter_continues_past_failed_addon_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote/v1/cart/add"))
        .and(body_string_contains("product_id=77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_item_json("line-base")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/remote/v1/cart/add"))
        .and(body_string_contains("product_id=610"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "error": "Out of stock" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/remote/v1/cart/add"))
        .and(body_string_contains("product_id=611"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_item_json("line-611")))
        .expect(1)
        .mount(&server)
        .await;

    let submitter = CartSubmitter::new(test_client(&server.uri()));
    let mut queue = AddonQueue::new();
    queue.append(AddonItem::new("610", 1)).unwrap();
    queue.append(AddonItem::new("611", 2)).unwrap();
    let base = AddToCartRequest::base("77", 1, vec![("attribute[12]".to_owned(), "41".to_owned())]);

    let outcome = submitter.submit(&base, queue).await;

    assert!(outcome.base_succeeded());
    assert_eq!(outcome.addon_results.len(), 2);
    let failed = outcome.addon_results[0].result.as_ref().unwrap_err();
    assert_eq!(failed.kind, FailureKind::Application);
    assert_eq!(failed.message, "Out of stock");
    assert!(outcome.addon_results[1].is_ok());
    assert_eq!(
        outcome.last_added().and_then(|a| a.cart_item_id.as_deref()),
        Some("line-611")
    );
}

#[tokio::test]
async fn submitter_reports_transport_failure_of_base_as_aborted_chain() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote/v1/cart/add"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let submitter = CartSubmitter::new(test_client(&server.uri()));
    let mut queue = AddonQueue::new();
    queue.append(AddonItem::new("610", 1)).unwrap();

    let outcome = submitter
        .submit(&AddToCartRequest::base("77", 1, Vec::new()), queue)
        .await;

    let aborted = outcome.chain_aborted().expect("base failure aborts the chain");
    assert_eq!(aborted.base.kind, FailureKind::Transport);
    assert_eq!(aborted.skipped_addons, 1);
    assert!(outcome.addon_results.is_empty());
}

// ---------------------------------------------------------------------------
// Cart update / quantity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_item_succeeds_on_succeed_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote/v1/cart/update"))
        .and(body_string_contains("\"quantity\":0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "status": "succeed" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.remove_item("line-1").await.expect("remove should succeed");
}

#[tokio::test]
async fn remove_item_joins_platform_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote/v1/cart/update"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "status": "failed", "errors": ["Item not found", "Cart expired"] }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.remove_item("line-1").await.unwrap_err();
    match err {
        ClientError::Api(message) => assert_eq!(message, "Item not found\nCart expired"),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn cart_quantity_sums_line_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/storefront/carts/cart-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cart-123",
            "lineItems": {
                "physicalItems": [{ "quantity": 2 }],
                "digitalItems": [],
                "customItems": [{ "quantity": 1 }],
                "giftCertificates": []
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert_eq!(client.cart_quantity("cart-123").await.unwrap(), 3);
}

#[tokio::test]
async fn cart_quantity_of_missing_cart_is_zero() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/storefront/carts/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert_eq!(client.cart_quantity("gone").await.unwrap(), 0);
}

#[tokio::test]
async fn cart_quantity_retries_after_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/storefront/carts/cart-123"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/storefront/carts/cart-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lineItems": { "physicalItems": [{ "quantity": 4 }] }
        })))
        .mount(&server)
        .await;

    let client = test_client_with_retries(&server.uri(), 2);
    assert_eq!(client.cart_quantity("cart-123").await.unwrap(), 4);
}

// ---------------------------------------------------------------------------
// Option change
// ---------------------------------------------------------------------------

#[tokio::test]
async fn option_change_sends_template_header_and_parses_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/remote/v1/product-attributes/77"))
        .and(header(
            "stencil-options",
            r#"{"render_with":"products/bulk-discount-rates"}"#,
        ))
        .and(body_string_contains("attribute%5B12%5D=41"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "out_of_stock_behavior": "hide_option",
                "in_stock_attributes": [41, 42],
                "sku": "SNS-PLANTER-L"
            },
            "content": { "bulk_discount_rates": "<ul></ul>" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let form = vec![("attribute[12]".to_owned(), "41".to_owned())];
    let response = client.option_change("77", &form).await.unwrap();

    assert_eq!(response.data.in_stock_attributes, [41, 42]);
    assert_eq!(response.data.sku.as_deref(), Some("SNS-PLANTER-L"));
    assert!(response.content.get("bulk_discount_rates").is_some());
}

// ---------------------------------------------------------------------------
// GraphQL
// ---------------------------------------------------------------------------

fn products_json(nodes: &[(i64, &str, f64)]) -> serde_json::Value {
    let edges: Vec<serde_json::Value> = nodes
        .iter()
        .map(|(id, name, price)| {
            json!({ "node": {
                "entityId": id,
                "name": name,
                "addToCartUrl": format!("https://shop.example.com/cart.php?action=add&product_id={id}"),
                "prices": { "price": { "currencyCode": "USD", "value": price } }
            }})
        })
        .collect();
    json!({ "data": { "site": { "products": { "edges": edges } } } })
}

#[tokio::test]
async fn product_info_with_no_ids_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.product_info(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn product_info_requires_token() {
    let server = MockServer::start().await;
    let client = StorefrontClient::with_base_url(&server.uri(), None, 5, "storefront-test/0.1", 0, 0)
        .expect("client construction should not fail");

    let err = client.product_info(&[610]).await.unwrap_err();
    assert!(matches!(err, ClientError::MissingToken));
}

#[tokio::test]
async fn product_info_surfaces_graphql_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Invalid token" }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.product_info(&[610]).await.unwrap_err();
    match err {
        ClientError::GraphQl(message) => assert_eq!(message, "Invalid token"),
        other => panic!("expected GraphQl error, got: {other:?}"),
    }
}

#[tokio::test]
async fn load_addon_catalog_resolves_metafield_ids() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_string_contains("metafieldQuery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "site": { "product": {
                "entityId": 77,
                "name": "Terracotta Planter",
                "metafields": { "edges": [
                    { "node": { "entityId": 1, "key": "free_add_ons", "value": "501" } },
                    { "node": { "entityId": 2, "key": "free_add_on_count", "value": "1" } },
                    { "node": { "entityId": 3, "key": "additional_add_ons", "value": "610,611" } }
                ]},
                "variants": { "edges": [
                    { "node": {
                        "entityId": 900,
                        "sku": "SNS-PLANTER-L",
                        "height": { "value": 12.0, "unit": "in" },
                        "width": { "value": 10.0, "unit": "in" },
                        "depth": null,
                        "options": { "edges": [
                            { "node": { "displayName": "Size", "values": { "edges": [ { "node": { "label": "Large" } } ] } } }
                        ]},
                        "metafields": { "edges": [] }
                    }}
                ]}
            }}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("productQuery"))
        .and(body_string_contains("[501]"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(products_json(&[(501, "Seed Pack", 0.0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("productQuery"))
        .and(body_string_contains("[610,611]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_json(&[
            (610, "Clay Saucer", 4.5),
            (611, "Potting Mix", 12.0),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let catalog = client.load_addon_catalog(77, "mcdesign").await.unwrap();

    assert_eq!(catalog.free.len(), 1);
    assert_eq!(catalog.free[0].name, "Seed Pack");
    assert_eq!(catalog.free_add_on_count, Some(1));
    assert!(catalog.shows_free_section());
    let additional: Vec<i64> = catalog.additional.iter().map(|o| o.entity_id).collect();
    assert_eq!(additional, [610, 611]);
    assert_eq!(catalog.variants.len(), 1);
    assert_eq!(catalog.variants[0].options.get("Size").map(String::as_str), Some("Large"));
    assert_eq!(catalog.variants[0].depth, None);
    assert_eq!(catalog.variants[0].unit.as_deref(), Some("in"));
}
