//! Admin sign-in guard, login and order status changes.

use reqwest::{StatusCode, header};
use serde_json::{Value, json};
use vitrine_integration_tests::{
    ADMIN_PASSWORD, ORDER_ID, client, start_admin, start_backend,
};

async fn signed_in_client(base: &str) -> reqwest::Client {
    let client = client();
    let resp = client
        .post(format!("{base}/login"))
        .json(&json!({
            "email": " Ana@Vitrine.com.br ",
            "password": ADMIN_PASSWORD,
            "next": "/orders"
        }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);
    client
}

#[tokio::test]
async fn test_health_is_public() {
    let backend = start_backend().await;
    let base = start_admin(&backend.url).await;

    let resp = client()
        .get(format!("{base}/health"))
        .send()
        .await
        .expect("Failed to call health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-frame-options"], "DENY");

    let resp = client()
        .get(format!("{base}/health/ready"))
        .send()
        .await
        .expect("Failed to call readiness");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_without_backend() {
    // Nothing listens on the discard port
    let base = start_admin("http://127.0.0.1:9").await;

    let resp = client()
        .get(format!("{base}/health/ready"))
        .send()
        .await
        .expect("Failed to call readiness");
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_guard_rejects_anonymous_requests() {
    let backend = start_backend().await;
    let base = start_admin(&backend.url).await;

    let resp = client()
        .get(format!("{base}/api/orders"))
        .send()
        .await
        .expect("Failed to list orders");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client()
        .get(format!("{base}/?tab=orders"))
        .send()
        .await
        .expect("Failed to open dashboard");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()[header::LOCATION],
        "/login?next=%2F%3Ftab%3Dorders"
    );
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let backend = start_backend().await;
    let base = start_admin(&backend.url).await;

    let resp = client()
        .post(format!("{base}/login"))
        .json(&json!({"email": "ana@vitrine.com.br", "password": "errada"}))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(!resp.headers().contains_key(header::SET_COOKIE));
    let body: Value = resp.json().await.expect("error body");
    assert_eq!(body["error"], "E-mail ou senha inválidos");
}

#[tokio::test]
async fn test_login_sets_cookie_and_redirect() {
    let backend = start_backend().await;
    let base = start_admin(&backend.url).await;

    let resp = client()
        .post(format!("{base}/login"))
        .json(&json!({
            "email": "ana@vitrine.com.br",
            "password": ADMIN_PASSWORD,
            "next": "//evil.example.com"
        }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp.headers()[header::SET_COOKIE]
        .to_str()
        .expect("cookie header")
        .to_string();
    assert!(cookie.starts_with("vitrine_admin_token=tok-123"));
    assert!(cookie.contains("HttpOnly"));

    let body: Value = resp.json().await.expect("login body");
    assert_eq!(body["redirect"], "/");
    assert_eq!(body["user"]["name"], "Ana");
}

#[tokio::test]
async fn test_order_status_change() {
    let backend = start_backend().await;
    let base = start_admin(&backend.url).await;
    let client = signed_in_client(&base).await;

    let order: Value = client
        .get(format!("{base}/api/orders/{ORDER_ID}"))
        .send()
        .await
        .expect("Failed to fetch order")
        .json()
        .await
        .expect("order body");
    assert_eq!(order["status"]["value"], "pending");
    assert_eq!(order["total"], "R$ 100,00");

    let resp = client
        .patch(format!("{base}/api/orders/{ORDER_ID}/status"))
        .json(&json!({"status": "paid"}))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(backend.recorded.order_status(), "paid");

    // Orders never move backwards
    let resp = client
        .patch(format!("{base}/api/orders/{ORDER_ID}/status"))
        .json(&json!({"status": "pending"}))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(backend.recorded.order_status(), "paid");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let backend = start_backend().await;
    let base = start_admin(&backend.url).await;
    let client = signed_in_client(&base).await;

    let resp = client
        .post(format!("{base}/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = client
        .get(format!("{base}/api/orders"))
        .send()
        .await
        .expect("Failed to list orders");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
