//! Storefront flows against the fake backend.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};
use vitrine_integration_tests::{
    COUPON_CODE, EXPIRED_COUPON_CODE, client, start_backend, start_storefront,
};

#[tokio::test]
async fn test_health_and_security_headers() {
    let backend = start_backend().await;
    let base = start_storefront(&backend.url).await;

    let resp = client()
        .get(format!("{base}/health"))
        .send()
        .await
        .expect("Failed to call health");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let backend = start_backend().await;
    let base = start_storefront(&backend.url).await;

    let resp = client()
        .get(format!("{base}/health"))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .expect("Failed to call health");

    assert_eq!(resp.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn test_product_listing_formats_prices() {
    let backend = start_backend().await;
    let base = start_storefront(&backend.url).await;

    let body: Value = client()
        .get(format!("{base}/products?min_price=10,00&categories=3"))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Failed to read products");

    let items = body["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["price"], "R$ 50,00");
    assert_eq!(items[0]["in_stock"], true);
    assert_eq!(items[1]["price"], "R$ 35,00");
    assert_eq!(items[1]["original_price"], "R$ 40,00");
    assert_eq!(items[1]["on_promo"], true);
    assert_eq!(items[1]["in_stock"], false);
}

#[tokio::test]
async fn test_bad_listing_filter() {
    let backend = start_backend().await;
    let base = start_storefront(&backend.url).await;

    let resp = client()
        .get(format!("{base}/products?sort=random"))
        .send()
        .await
        .expect("Failed to list products");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let backend = start_backend().await;
    let base = start_storefront(&backend.url).await;

    let resp = client()
        .get(format!("{base}/products/999"))
        .send()
        .await
        .expect("Failed to fetch product");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("error body");
    assert_eq!(body["error"], "Não encontrado");
}

#[tokio::test]
async fn test_cart_lives_in_session() {
    let backend = start_backend().await;
    let base = start_storefront(&backend.url).await;
    let client = client();

    let cart: Value = client
        .post(format!("{base}/cart/add"))
        .json(&json!({"product_id": 1, "quantity": 2}))
        .send()
        .await
        .expect("Failed to add to cart")
        .json()
        .await
        .expect("cart body");
    assert_eq!(cart["item_count"], 2);
    assert_eq!(cart["total"], "R$ 100,00");

    let count: Value = client
        .get(format!("{base}/cart/count"))
        .send()
        .await
        .expect("Failed to count cart")
        .json()
        .await
        .expect("count body");
    assert_eq!(count["count"], 2);

    // A fresh client has its own session
    let other: Value = vitrine_integration_tests::client()
        .get(format!("{base}/cart/count"))
        .send()
        .await
        .expect("Failed to count cart")
        .json()
        .await
        .expect("count body");
    assert_eq!(other["count"], 0);
}

#[tokio::test]
async fn test_out_of_stock_product_rejected() {
    let backend = start_backend().await;
    let base = start_storefront(&backend.url).await;

    let resp = client()
        .post(format!("{base}/cart/add"))
        .json(&json!({"product_id": 2}))
        .send()
        .await
        .expect("Failed to add to cart");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_coupon_applies_discount() {
    let backend = start_backend().await;
    let base = start_storefront(&backend.url).await;
    let client = client();

    client
        .post(format!("{base}/cart/add"))
        .json(&json!({"product_id": 1, "quantity": 2}))
        .send()
        .await
        .expect("Failed to add to cart");

    let resp = client
        .post(format!("{base}/cart/coupon"))
        .json(&json!({"code": "nope"}))
        .send()
        .await
        .expect("Failed to apply coupon");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let cart: Value = client
        .post(format!("{base}/cart/coupon"))
        .json(&json!({"code": " dez "}))
        .send()
        .await
        .expect("Failed to apply coupon")
        .json()
        .await
        .expect("cart body");
    assert_eq!(cart["coupon"], COUPON_CODE);
    assert_eq!(cart["discount"], "R$ 10,00");
    assert_eq!(cart["total"], "R$ 90,00");
}

#[tokio::test]
async fn test_expired_coupon_rejected() {
    let backend = start_backend().await;
    let base = start_storefront(&backend.url).await;
    let client = client();

    client
        .post(format!("{base}/cart/add"))
        .json(&json!({"product_id": 1, "quantity": 2}))
        .send()
        .await
        .expect("Failed to add to cart");

    let resp = client
        .post(format!("{base}/cart/coupon"))
        .json(&json!({"code": EXPIRED_COUPON_CODE}))
        .send()
        .await
        .expect("Failed to apply coupon");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let cart: Value = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .expect("Failed to show cart")
        .json()
        .await
        .expect("cart body");
    assert_eq!(cart["coupon"], Value::Null);
    assert_eq!(cart["total"], "R$ 100,00");
}

fn checkout_form() -> Value {
    json!({
        "name": "Maria Silva",
        "email": "Maria@Exemplo.com.br",
        "cpf": "529.982.247-25",
        "phone": "43999998888",
        "cep": "86010000",
        "street": "Rua Sergipe",
        "number": "100",
        "district": "Centro",
        "city": "Londrina",
        "state": "pr"
    })
}

#[tokio::test]
async fn test_checkout_places_order_and_clears_cart() {
    let backend = start_backend().await;
    let base = start_storefront(&backend.url).await;
    let client = client();

    client
        .post(format!("{base}/cart/add"))
        .json(&json!({"product_id": 1, "quantity": 2}))
        .send()
        .await
        .expect("Failed to add to cart");
    client
        .post(format!("{base}/cart/coupon"))
        .json(&json!({"code": COUPON_CODE}))
        .send()
        .await
        .expect("Failed to apply coupon");

    let resp = client
        .post(format!("{base}/checkout"))
        .json(&checkout_form())
        .send()
        .await
        .expect("Failed to check out");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let confirmation: Value = resp.json().await.expect("confirmation body");
    assert_eq!(confirmation["id"], 1001);
    assert_eq!(confirmation["status"], "Pendente");
    assert_eq!(confirmation["total"], "R$ 90,00");
    assert_eq!(confirmation["created_at"], "01/07/2024");

    let orders = backend.recorded.orders();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order["customer"]["email"], "maria@exemplo.com.br");
    assert_eq!(order["customer"]["document"], "529.982.247-25");
    assert_eq!(order["customer"]["phone"], "(43) 99999-8888");
    assert_eq!(order["address"]["cep"], "86010-000");
    assert_eq!(order["address"]["state"], "PR");
    assert_eq!(order["coupon_code"], COUPON_CODE);
    assert_eq!(order["items"][0]["product_id"], 1);
    assert_eq!(order["items"][0]["quantity"], 2);

    let count: Value = client
        .get(format!("{base}/cart/count"))
        .send()
        .await
        .expect("Failed to count cart")
        .json()
        .await
        .expect("count body");
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_checkout_validation() {
    let backend = start_backend().await;
    let base = start_storefront(&backend.url).await;
    let client = client();

    // Empty cart
    let resp = client
        .post(format!("{base}/checkout"))
        .json(&checkout_form())
        .send()
        .await
        .expect("Failed to check out");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    client
        .post(format!("{base}/cart/add"))
        .json(&json!({"product_id": 1}))
        .send()
        .await
        .expect("Failed to add to cart");

    let mut form = checkout_form();
    form["cpf"] = json!("111.111.111-11");
    let resp = client
        .post(format!("{base}/checkout"))
        .json(&form)
        .send()
        .await
        .expect("Failed to check out");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("error body");
    assert_eq!(body["error"], "CPF inválido");

    assert!(backend.recorded.orders().is_empty());
}

async fn add_coffee(client: &reqwest::Client, base: &str) {
    let resp = client
        .post(format!("{base}/cart/add"))
        .json(&json!({"product_id": 1}))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);
}

async fn cart_count(client: &reqwest::Client, base: &str) -> u64 {
    let body: Value = client
        .get(format!("{base}/cart/count"))
        .send()
        .await
        .expect("Failed to count cart")
        .json()
        .await
        .expect("count body");
    body["count"].as_u64().expect("numeric count")
}

#[tokio::test]
async fn test_concurrent_checkouts_from_one_session() {
    let backend = start_backend().await;
    backend.recorded.delay_orders(Duration::from_millis(800));
    let base = start_storefront(&backend.url).await;
    let client = client();
    add_coffee(&client, &base).await;

    let first = client
        .post(format!("{base}/checkout"))
        .json(&checkout_form())
        .send();
    let second = async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        client
            .post(format!("{base}/checkout"))
            .json(&checkout_form())
            .send()
            .await
    };
    let (first, second) = tokio::join!(first, second);

    let mut statuses = vec![
        first.expect("Failed to check out").status(),
        second.expect("Failed to check out").status(),
    ];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
    assert_eq!(backend.recorded.orders().len(), 1);
}

#[tokio::test]
async fn test_checkout_unlocks_after_backend_error() {
    let backend = start_backend().await;
    backend.recorded.fail_orders(true);
    let base = start_storefront(&backend.url).await;
    let client = client();
    add_coffee(&client, &base).await;

    let resp = client
        .post(format!("{base}/checkout"))
        .json(&checkout_form())
        .send()
        .await
        .expect("Failed to check out");
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(cart_count(&client, &base).await, 1);

    backend.recorded.fail_orders(false);
    let resp = client
        .post(format!("{base}/checkout"))
        .json(&checkout_form())
        .send()
        .await
        .expect("Failed to check out");
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(cart_count(&client, &base).await, 0);
}

#[tokio::test]
async fn test_checkout_completes_after_client_disconnects() {
    let backend = start_backend().await;
    backend.recorded.delay_orders(Duration::from_millis(1000));
    let base = start_storefront(&backend.url).await;
    let client = client();
    add_coffee(&client, &base).await;

    let err = client
        .post(format!("{base}/checkout"))
        .json(&checkout_form())
        .timeout(Duration::from_millis(300))
        .send()
        .await
        .expect_err("checkout should outlast the client timeout");
    assert!(err.is_timeout());

    // The order still reaches the backend and the session is cleaned up
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(backend.recorded.orders().len(), 1);
    assert_eq!(cart_count(&client, &base).await, 0);

    add_coffee(&client, &base).await;
    let resp = client
        .post(format!("{base}/checkout"))
        .json(&checkout_form())
        .send()
        .await
        .expect("Failed to check out");
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(backend.recorded.orders().len(), 2);
}
