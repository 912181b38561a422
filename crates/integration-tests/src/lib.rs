//! Integration tests for Vitrine.
//!
//! Each test starts the storefront or admin router on an ephemeral port,
//! pointed at an in-process fake of the backend REST API, and drives it with
//! a cookie-aware `reqwest` client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront` - Catalog, cart and checkout flows
//! - `admin` - Sign-in guard, login and order status changes
//! - `formatting` - Formatter behaviour across the core crate

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Password the fake backend accepts for any e-mail.
pub const ADMIN_PASSWORD: &str = "segredo";

/// Bearer token the fake backend issues on login.
pub const ADMIN_TOKEN: &str = "tok-123";

/// Coupon code the fake backend knows about (10% off).
pub const COUPON_CODE: &str = "DEZ";

/// Coupon code the fake backend serves with an expiry date long past.
pub const EXPIRED_COUPON_CODE: &str = "VENCIDO";

/// Order id the fake backend serves to the admin.
pub const ORDER_ID: i64 = 42;

/// Requests the fake backend has seen, for assertions.
#[derive(Clone, Default)]
pub struct Recorded {
    inner: Arc<Mutex<RecordedInner>>,
}

#[derive(Default)]
struct RecordedInner {
    orders: Vec<Value>,
    order_status: Option<String>,
    order_delay: Option<Duration>,
    fail_orders: bool,
}

impl Recorded {
    fn with<T>(&self, f: impl FnOnce(&mut RecordedInner) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Order payloads posted by the storefront.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        self.with(|r| r.orders.clone())
    }

    /// Hold every order response for `delay`, like a slow payment step.
    pub fn delay_orders(&self, delay: Duration) {
        self.with(|r| r.order_delay = Some(delay));
    }

    /// Answer order submissions with 500 until switched off.
    pub fn fail_orders(&self, fail: bool) {
        self.with(|r| r.fail_orders = fail);
    }

    /// Current status of the admin order.
    #[must_use]
    pub fn order_status(&self) -> String {
        self.with(|r| {
            r.order_status
                .clone()
                .unwrap_or_else(|| "pending".to_string())
        })
    }
}

fn product(id: i64) -> Option<Value> {
    match id {
        1 => Some(json!({
            "id": 1, "nome": "Café Especial 500g", "preco": "50,00",
            "estoque": "12", "categoria_id": 3, "ativo": true
        })),
        2 => Some(json!({
            "id": 2, "nome": "Mel Silvestre", "preco": 40,
            "preco_promocional": "35,00", "quantity": 0, "ativo": true
        })),
        _ => None,
    }
}

fn order(status: &str) -> Value {
    json!({
        "id": ORDER_ID,
        "cliente_nome": "Maria Silva",
        "email": "maria@exemplo.com.br",
        "itens": [
            {"product_id": 1, "name": "Café Especial 500g", "quantity": 2, "unit_price": "50,00"}
        ],
        "total": "100,00",
        "status": status,
        "criado_em": "2024-07-01T10:00:00Z"
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ADMIN_TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Token inválido"})),
    )
        .into_response()
}

async fn list_products() -> Json<Value> {
    Json(json!({
        "data": [product(1), product(2)],
        "total": 2, "page": 1, "limit": 12
    }))
}

async fn get_product(Path(id): Path<i64>) -> Response {
    match product(id) {
        Some(p) => Json(json!({"data": p})).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "not found"}))).into_response(),
    }
}

async fn get_coupon(Path(code): Path<String>) -> Response {
    if code == COUPON_CODE {
        Json(json!({"codigo": COUPON_CODE, "tipo": "percentual", "valor": "10"})).into_response()
    } else if code == EXPIRED_COUPON_CODE {
        Json(json!({
            "codigo": EXPIRED_COUPON_CODE, "tipo": "percentual", "valor": "50",
            "expira_em": "2000-01-01"
        }))
        .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Cupom não encontrado"})),
        )
            .into_response()
    }
}

async fn create_order(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Response {
    let (delay, fail) = recorded.with(|r| (r.order_delay, r.fail_orders));
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if fail {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Falha ao gravar pedido"})),
        )
            .into_response();
    }
    recorded.with(|r| r.orders.push(body));
    (
        StatusCode::CREATED,
        Json(json!({
            "data": {
                "id": 1001, "status": "pendente", "total": "90,00",
                "criado_em": "2024-07-01T10:00:00Z"
            }
        })),
    )
        .into_response()
}

async fn admin_login(Json(body): Json<Value>) -> Response {
    if body["password"] == ADMIN_PASSWORD {
        Json(json!({
            "token": ADMIN_TOKEN,
            "usuario": {"nome": "Ana", "email": body["email"]}
        }))
        .into_response()
    } else {
        unauthorized()
    }
}

async fn admin_orders(State(recorded): State<Recorded>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"data": [order(&recorded.order_status())], "total": 1})).into_response()
}

async fn admin_order(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if id != ORDER_ID {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "not found"}))).into_response();
    }
    Json(order(&recorded.order_status())).into_response()
}

async fn admin_order_status(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let status = body["status"].as_str().unwrap_or_default().to_string();
    recorded.with(|r| r.order_status = Some(status.clone()));
    Json(order(&status)).into_response()
}

/// Router that answers the backend endpoints both services call.
pub fn fake_backend(recorded: Recorded) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(get_product))
        .route("/api/public/coupons/{code}", get(get_coupon))
        .route("/api/public/orders", post(create_order))
        .route("/api/admin/login", post(admin_login))
        .route("/api/admin/orders", get(admin_orders))
        .route("/api/admin/orders/{id}", get(admin_order))
        .route("/api/admin/orders/{id}/status", patch(admin_order_status))
        .with_state(recorded)
}

/// Serve `router` on an ephemeral local port.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .ok();
    });
    addr
}

/// A fake backend plus the address it listens on.
pub struct Backend {
    pub url: String,
    pub recorded: Recorded,
}

/// Start a fake backend.
pub async fn start_backend() -> Backend {
    let recorded = Recorded::default();
    let addr = spawn(fake_backend(recorded.clone())).await;
    Backend {
        url: format!("http://{addr}"),
        recorded,
    }
}

/// Start the storefront against `backend_url` and return its base URL.
///
/// # Panics
///
/// Panics if `backend_url` is not a valid backend URL.
pub async fn start_storefront(backend_url: &str) -> String {
    use vitrine_storefront::config::{BackendConfig, StorefrontConfig, parse_backend_url};

    let config = StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://localhost".to_string(),
        backend: BackendConfig {
            base_url: parse_backend_url(backend_url).expect("backend url"),
            api_key: None,
            cache_ttl: Duration::from_secs(60),
        },
        sentry_dsn: None,
        sentry_environment: None,
    };
    let app = vitrine_storefront::app(vitrine_storefront::state::AppState::new(config));
    format!("http://{}", spawn(app).await)
}

/// Start the admin against `backend_url` and return its base URL.
///
/// # Panics
///
/// Panics if `backend_url` is not a valid backend URL.
pub async fn start_admin(backend_url: &str) -> String {
    use vitrine_admin::config::{AdminConfig, parse_backend_url};

    let config = AdminConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://localhost".to_string(),
        backend_url: parse_backend_url(backend_url).expect("backend url"),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
    };
    let app = vitrine_admin::app(vitrine_admin::state::AppState::new(config));
    format!("http://{}", spawn(app).await)
}

/// HTTP client that keeps cookies and does not follow redirects.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}
