//! Integration tests for the checkout path with real adapters
//!
//! **Coverage:**
//! - Happy path: cart sourcing → cached result → order submission carrying
//!   the sourced shipments
//! - Cart-mismatch: an order drafted for different items must not carry the
//!   stale sourcing block
//! - Submission failure surfaces the backend error instead of fallback data
//!
//! **Infrastructure:**
//! - WireMock HTTP server simulating the OAuth token endpoint, OMSA and OMF
//! - Real `OmsaClient`/`OmfClient` wired through `CheckoutService`

use std::sync::Arc;

use storebridge_core::CheckoutService;
use storebridge_domain::{
    BackendSystem, CartItem, CustomerDetails, DeliveryAddress, OrderDraft, PaymentOption,
    ShippingOption, StoreBridgeError, SystemCredentials,
};
use storebridge_infra::{AuthGateway, CredentialResolver, OmfClient, OmsaClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials(server: &MockServer) -> SystemCredentials {
    SystemCredentials {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        token_url: format!("{}/oauth/token", server.uri()),
        base_url: server.uri(),
    }
}

fn checkout_service(server: &MockServer) -> CheckoutService {
    let resolver = Arc::new(CredentialResolver::with_credentials([
        (BackendSystem::Omsa, credentials(server)),
        (BackendSystem::Omf, credentials(server)),
    ]));
    let gateway = Arc::new(AuthGateway::new(resolver.clone()).expect("gateway"));
    let omsa = Arc::new(OmsaClient::new(gateway.clone(), resolver.clone()).expect("omsa client"));
    let omf = Arc::new(OmfClient::new(gateway, resolver).expect("omf client"));
    CheckoutService::new(omsa, omf)
}

async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "test-token",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

async fn mount_sourcing(server: &MockServer, shipment_count: usize) {
    let shipments: Vec<serde_json::Value> = (0..shipment_count)
        .map(|index| serde_json::json!({ "site": { "id": format!("10{}0", index + 1) } }))
        .collect();
    Mock::given(method("POST"))
        .and(path("/v1/sourcing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sourcingResult": { "shipments": shipments }
        })))
        .mount(server)
        .await;
}

fn cart_item(product_id: &str, quantity: u32, unit_price: f64) -> CartItem {
    CartItem {
        product_id: product_id.to_string(),
        quantity,
        unit: "piece".to_string(),
        unit_price,
        description: format!("Product {}", product_id),
    }
}

fn draft_for(items: Vec<CartItem>) -> OrderDraft {
    OrderDraft {
        customer: CustomerDetails {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
        },
        address: DeliveryAddress {
            street_line: "Hauptstraße 78a".to_string(),
            city: "Berlin".to_string(),
            postal_code: "10115".to_string(),
            country: "Germany".to_string(),
        },
        items,
        shipping: ShippingOption { method: "standard".to_string(), cost: 4.99 },
        payment: PaymentOption { method: "card".to_string() },
    }
}

#[tokio::test]
async fn sourced_cart_submits_order_with_matching_counts() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;
    mount_sourcing(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/v2/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "o-1",
            "orderNumber": "1000",
            "status": "CREATED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = checkout_service(&server);
    let items = vec![cart_item("29", 2, 89.99), cart_item("30", 1, 149.0)];

    let sourcing = service.trigger_sourcing(&items).await;
    assert!(sourcing.success);

    let order = service.place_order(&draft_for(items.clone())).await.expect("order");
    assert_eq!(order.order_id, "o-1");
    assert_eq!(order.items.len(), 2);

    // The submitted payload mirrors the cart and the cached shipment plan.
    let requests = server.received_requests().await.unwrap();
    let submission = requests
        .iter()
        .find(|request| request.url.path() == "/api/v2/orders")
        .expect("order submission");
    let body: serde_json::Value = serde_json::from_slice(&submission.body).unwrap();
    assert_eq!(body["orderItems"].as_array().unwrap().len(), items.len());
    assert_eq!(body["sourcing"]["shipments"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn order_for_changed_cart_omits_stale_sourcing() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;
    mount_sourcing(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/api/v2/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "o-2",
            "orderNumber": "1001",
            "status": "CREATED"
        })))
        .mount(&server)
        .await;

    let service = checkout_service(&server);
    service.trigger_sourcing(&[cart_item("29", 2, 89.99)]).await;

    // The associate changed the quantity after the last sourcing trigger.
    let changed_items = vec![cart_item("29", 3, 89.99)];
    service.place_order(&draft_for(changed_items)).await.expect("order");

    let requests = server.received_requests().await.unwrap();
    let submission = requests
        .iter()
        .find(|request| request.url.path() == "/api/v2/orders")
        .expect("order submission");
    let body: serde_json::Value = serde_json::from_slice(&submission.body).unwrap();
    assert!(body.get("sourcing").is_none());
}

#[tokio::test]
async fn submission_failure_is_surfaced_not_substituted() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;
    mount_sourcing(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/v2/orders"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "error": { "code": "OMF-422", "message": "invalid postal code" }
        })))
        .mount(&server)
        .await;

    let service = checkout_service(&server);
    let items = vec![cart_item("29", 1, 89.99)];
    service.trigger_sourcing(&items).await;

    let err = service.place_order(&draft_for(items)).await.expect_err("must fail");
    match err {
        StoreBridgeError::OrderSubmission { code, message } => {
            assert_eq!(code.as_deref(), Some("OMF-422"));
            assert!(message.contains("invalid postal code"));
        }
        other => panic!("expected order submission error, got {:?}", other),
    }
}
