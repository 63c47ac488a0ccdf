//! End-to-end storefront tests: browse, fill the cart, check out, and the
//! htmx fragments, all through the real router and middleware stack.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use nfxseller_core::checkout::encode_uri_component;
use nfxseller_integration_tests::{TestClient, TestResponse};

fn assert_redirect(response: &TestResponse, to: &str) {
    assert_eq!(response.status, StatusCode::SEE_OTHER, "body: {}", response.body);
    assert_eq!(response.location(), Some(to));
}

// =============================================================================
// Browsing
// =============================================================================

#[tokio::test]
async fn test_health() {
    let mut client = TestClient::new();
    let response = client.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_home_lists_products_and_promo() {
    let mut client = TestClient::new();
    let response = client.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("All Products"));
    assert!(response.body.contains("Gemini AI"));
    assert!(response.body.contains("Individual Plan"));
    assert!(response.body.contains("Netflix"));
    assert!(response.body.contains("Contact for Price"));
    assert!(response.body.contains("Service Unavailable"));
    assert!(response.body.contains("PREMIUM ACCOUNTS ARE BACK IN STOCK"));
}

#[tokio::test]
async fn test_home_search_without_matches() {
    let mut client = TestClient::new();
    let response = client.get("/?q=zzzz-no-such-product").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("No products match"));
    assert!(!response.body.contains("/products/s1\""));
}

#[tokio::test]
async fn test_product_detail_shows_validity_options() {
    let mut client = TestClient::new();
    let response = client.get("/products/s1").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Netflix"));
    assert!(response.body.contains("1-month - ₹159"));
    assert!(response.body.contains("1-year - ₹1,699"));
    assert!(response.body.contains("You might also like..."));
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let mut client = TestClient::new();
    let response = client.get("/products/does-not-exist").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("Product not found"));
}

#[tokio::test]
async fn test_browsing_does_not_start_a_session() {
    for path in ["/", "/?q=netflix", "/pages/refund-policy", "/fragments/cart-count"] {
        let mut client = TestClient::new();
        let response = client.get(path).await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(
            !response.headers.contains_key("set-cookie"),
            "{path} set a session cookie"
        );
    }
}

#[tokio::test]
async fn test_adding_to_cart_starts_a_session() {
    let mut client = TestClient::new();
    let response = client.post_form("/cart/add", &[("product_id", "t1")]).await;
    assert!(response.headers.contains_key("set-cookie"));
}

#[tokio::test]
async fn test_back_to_products_goes_home() {
    let mut client = TestClient::new();
    client.get("/products/t1").await;
    let response = client.post_form("/products/t1/back", &[]).await;
    assert_redirect(&response, "/");
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_add_merges_and_shows_toast() {
    let mut client = TestClient::new();

    let response = client
        .post_form(
            "/cart/add",
            &[("product_id", "t1"), ("quantity", "1")],
        )
        .await;
    assert_redirect(&response, "/products/t1");
    client
        .post_form("/cart/add", &[("product_id", "t1"), ("quantity", "2")])
        .await;

    let cart = client.get("/cart").await;
    assert_eq!(cart.status, StatusCode::OK);
    assert!(cart.body.contains("Amazon Refund Trick"));
    assert!(cart.body.contains("one-time"));
    assert!(cart.body.contains("Total: ₹1,197"));
    assert!(cart.body.contains("Added to Cart"));

    // Toasts are shown once
    let again = client.get("/cart").await;
    assert!(!again.body.contains("Added to Cart"));
}

#[tokio::test]
async fn test_add_rejects_unpurchasable_product() {
    let mut client = TestClient::new();

    client.post_form("/cart/add", &[("product_id", "o5")]).await;
    let cart = client.get("/cart").await;

    assert!(cart.body.contains("Could not add this item to the cart."));
    assert!(cart.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_add_requires_known_validity() {
    let mut client = TestClient::new();

    client
        .post_form("/cart/add", &[("product_id", "s1"), ("validity", "10-year")])
        .await;
    let cart = client.get("/cart").await;
    assert!(cart.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_add_ignores_offsite_return_path() {
    let mut client = TestClient::new();

    let response = client
        .post_form(
            "/cart/add",
            &[
                ("product_id", "s1"),
                ("validity", "1-month"),
                ("return_to", "//evil.example/"),
            ],
        )
        .await;
    assert_redirect(&response, "/products/s1");

    let response = client
        .post_form(
            "/cart/add",
            &[("product_id", "g_family"), ("validity", "1-month"), ("return_to", "/")],
        )
        .await;
    assert_redirect(&response, "/");
}

#[tokio::test]
async fn test_increase_decrease_remove_clear() {
    let mut client = TestClient::new();
    client
        .post_form("/cart/add", &[("product_id", "d3"), ("validity", "1-year")])
        .await;
    client.post_form("/cart/add", &[("product_id", "t2")]).await;

    let line = [("product_id", "d3"), ("validity", "1-year")];
    assert_redirect(&client.post_form("/cart/increase", &line).await, "/cart");
    assert!(client.get("/cart").await.body.contains("Total: ₹747"));

    client.post_form("/cart/decrease", &line).await;
    client.post_form("/cart/decrease", &line).await;
    let cart = client.get("/cart").await;
    assert!(!cart.body.contains("Canva Pro"));
    assert!(cart.body.contains("Telegram Automation"));

    // One-time lines are keyed by an empty validity
    client
        .post_form("/cart/remove", &[("product_id", "t2"), ("validity", "")])
        .await;
    assert!(client.get("/cart").await.body.contains("Your cart is empty."));

    client.post_form("/cart/add", &[("product_id", "t2")]).await;
    assert_redirect(&client.post_form("/cart/clear", &[]).await, "/cart");
    assert!(client.get("/cart").await.body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_decrease_on_missing_line_is_harmless() {
    let mut client = TestClient::new();
    let response = client
        .post_form("/cart/decrease", &[("product_id", "s1"), ("validity", "1-month")])
        .await;
    assert_redirect(&response, "/cart");
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_full_checkout_flow() {
    let mut client = TestClient::new();

    client
        .post_form(
            "/cart/add",
            &[("product_id", "s1"), ("validity", "1-month"), ("quantity", "1")],
        )
        .await;
    client
        .post_form(
            "/cart/add",
            &[("product_id", "d3"), ("validity", "1-year"), ("quantity", "2")],
        )
        .await;

    let cart = client.get("/cart").await;
    assert!(cart.body.contains("Total: ₹657"));

    let checkout = client.get("/checkout").await;
    assert_eq!(checkout.status, StatusCode::OK);
    assert!(checkout.body.contains("Order Summary"));
    assert!(checkout.body.contains("Netflix (1-month) x1"));
    assert!(checkout.body.contains("Canva Pro (1-year) x2"));
    assert!(checkout.body.contains("UPI ID: aashusinghadi8252@okaxis"));

    // Refreshing the checkout page keeps it open
    assert_eq!(client.get("/checkout").await.status, StatusCode::OK);

    let placed = client.post_form("/checkout", &[]).await;
    assert_redirect(&placed, "/checkout/confirmation");

    let confirmation = client.get("/checkout/confirmation").await;
    assert_eq!(confirmation.status, StatusCode::OK);
    assert!(confirmation.body.contains("Order Initiated!"));
    assert!(confirmation.body.contains("UPI-ORD-"));
    assert!(confirmation.body.contains("https://wa.me/918863889778?text=Hello!%20I"));
    assert!(
        confirmation
            .body
            .contains(&encode_uri_component("Netflix x1 (1-month) - ₹159"))
    );
    assert!(confirmation.body.contains(&encode_uri_component("Total: ₹657")));

    // The cart survives until the confirmation is closed
    assert!(client.get("/fragments/cart-count").await.body.contains(">3<"));

    let closed = client.post_form("/checkout/confirmation/close", &[]).await;
    assert_redirect(&closed, "/");

    assert!(client.get("/cart").await.body.contains("Your cart is empty."));
    assert_redirect(&client.get("/checkout/confirmation").await, "/");
}

#[tokio::test]
async fn test_checkout_back_returns_to_cart() {
    let mut client = TestClient::new();
    client.get("/cart").await;
    client.get("/checkout").await;

    let response = client.post_form("/checkout/back", &[]).await;
    assert_redirect(&response, "/cart");
}

#[tokio::test]
async fn test_checkout_requires_coming_from_cart() {
    let mut client = TestClient::new();
    client.get("/").await;

    let response = client.get("/checkout").await;
    assert_redirect(&response, "/cart");
}

#[tokio::test]
async fn test_placing_empty_order_is_rejected() {
    let mut client = TestClient::new();

    let response = client.post_form("/checkout", &[]).await;
    assert_redirect(&response, "/cart");

    let cart = client.get("/cart").await;
    assert!(cart.body.contains("toast-error"));
    assert_redirect(&client.get("/checkout/confirmation").await, "/");
}

#[tokio::test]
async fn test_configured_whatsapp_number_is_used() {
    let mut client = TestClient::with_env(&[("WHATSAPP_NUMBER", "+15555550100")]);
    client.post_form("/cart/add", &[("product_id", "t1")]).await;
    client.post_form("/checkout", &[]).await;

    let confirmation = client.get("/checkout/confirmation").await;
    assert!(confirmation.body.contains("https://wa.me/15555550100?text="));
}

// =============================================================================
// Fragments and pages
// =============================================================================

#[tokio::test]
async fn test_banner_fragment_advances() {
    let mut client = TestClient::new();
    let response = client.get("/fragments/banner?step=1").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("NEW ARRIVALS EVERY WEEK"));
    assert!(response.body.contains("/fragments/banner?step=2"));

    let wrapped = client.get("/fragments/banner?step=2").await;
    assert!(wrapped.body.contains("/fragments/banner?step=0"));
}

#[tokio::test]
async fn test_typewriter_fragment() {
    let mut client = TestClient::new();
    let response = client.get("/fragments/typewriter?step=0").await;

    assert!(response.body.contains(">S<"));
    assert!(response.body.contains("/fragments/typewriter?step=1"));
}

#[tokio::test]
async fn test_countdown_fragment_after_offer_end() {
    let mut client = TestClient::with_env(&[("OFFER_ENDS_AT", "2020-01-01T00:00:00Z")]);
    let response = client.get("/fragments/countdown").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Days"));
    // Stops polling once the offer is over
    assert!(!response.body.contains("hx-get"));
}

#[tokio::test]
async fn test_toast_dismiss_fragment_is_empty() {
    let mut client = TestClient::new();
    let response = client.get("/fragments/empty").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_refund_policy_page() {
    let mut client = TestClient::new();
    let response = client.get("/pages/refund-policy").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Refund Policy"));
}

#[tokio::test]
async fn test_pages_carry_csp_nonce() {
    let mut client = TestClient::new();
    let response = client.get("/").await;

    let csp = response
        .headers
        .get("content-security-policy")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let nonce = csp
        .split("'nonce-")
        .nth(1)
        .and_then(|rest| rest.split('\'').next())
        .unwrap();
    assert!(response.body.contains(&format!("nonce=\"{nonce}\"")));
}
