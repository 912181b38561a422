//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                     - Health check
//!
//! # Auth
//! GET    /login                      - Login hint (where to go after signing in)
//! POST   /login                      - Exchange credentials for the token cookie
//! POST   /logout                     - Clear the token cookie
//!
//! # Dashboard
//! GET    /                           - Pending orders and latest orders
//!
//! # Catalog
//! GET    /api/products               - Product listing (page, search)
//! POST   /api/products               - Create product
//! GET    /api/products/{id}          - Product detail
//! PUT    /api/products/{id}          - Update product
//! DELETE /api/products/{id}          - Delete product
//! GET    /api/services               - Service listing
//! POST   /api/services               - Create service
//! PUT    /api/services/{id}          - Update service
//! DELETE /api/services/{id}          - Delete service
//!
//! # Orders
//! GET    /api/orders                 - Order listing (status, page)
//! GET    /api/orders/{id}            - Order detail
//! PATCH  /api/orders/{id}/status     - Move order to a new status
//!
//! # Coupons
//! GET    /api/coupons                - Coupon listing
//! POST   /api/coupons                - Create coupon
//! DELETE /api/coupons/{id}           - Delete coupon
//!
//! # News
//! GET    /api/news/posts             - Post listing (page)
//! POST   /api/news/posts             - Create post
//! PUT    /api/news/posts/{id}        - Update post
//! DELETE /api/news/posts/{id}        - Delete post
//! ```

pub mod auth;
pub mod coupons;
pub mod dashboard;
pub mod news;
pub mod orders;
pub mod products;
pub mod services;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;
use vitrine_core::Page;
use vitrine_core::format::{format_date_br, parse_currency};

use crate::error::{AppError, Result};
use crate::middleware::login_rate_limiter;
use crate::state::AppState;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(login_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/services", get(services::index).post(services::create))
        .route(
            "/services/{id}",
            put(services::update).delete(services::destroy),
        )
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", patch(orders::update_status))
        .route("/coupons", get(coupons::index).post(coupons::create))
        .route("/coupons/{id}", delete(coupons::destroy))
        .route("/news/posts", get(news::index).post(news::create))
        .route("/news/posts/{id}", put(news::update).delete(news::destroy))
}

// =============================================================================
// Shared view and form helpers
// =============================================================================

/// A page of view items plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
}

impl<T> PageView<T> {
    pub fn from_page<U>(page: &Page<U>, view: impl FnMut(&U) -> T) -> Self {
        Self {
            items: page.items.iter().map(view).collect(),
            page: page.page,
            total: page.total,
            total_pages: page.total_pages(),
            has_next_page: page.has_next_page(),
        }
    }
}

/// `?page=` and `?search=` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub search: Option<String>,
}

/// Accept a form field typed as either a JSON string or a number.
///
/// `null` and a missing field both read as an empty string.
fn raw_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or a number, got {other}"
        ))),
    }
}

/// Serde default for form checkboxes that start ticked.
pub(crate) const fn default_true() -> bool {
    true
}

fn required(value: &str, message: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(message.to_string()));
    }
    Ok(value.to_string())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Currency input as a two-place decimal; unparseable input reads as zero.
fn money(raw: &str) -> Decimal {
    Decimal::from_f64_retain(parse_currency(raw))
        .unwrap_or_default()
        .round_dp(2)
}

/// Like [`money`], but blank input means "no value".
fn optional_money(raw: &str) -> Option<Decimal> {
    (!raw.trim().is_empty()).then(|| money(raw))
}

fn display_date(raw: Option<&str>) -> Option<String> {
    raw.map(format_date_br).filter(|d| !d.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "raw_text")]
        price: String,
    }

    #[test]
    fn test_raw_text_accepts_strings_and_numbers() {
        let form: Form = serde_json::from_str(r#"{"price": "1.234,50"}"#).unwrap();
        assert_eq!(form.price, "1.234,50");

        let form: Form = serde_json::from_str(r#"{"price": 19.9}"#).unwrap();
        assert_eq!(form.price, "19.9");

        let form: Form = serde_json::from_str("{}").unwrap();
        assert_eq!(form.price, "");

        assert!(serde_json::from_str::<Form>(r#"{"price": [1]}"#).is_err());
    }

    #[test]
    fn test_money() {
        assert_eq!(money("R$ 1.234,56"), Decimal::new(123_456, 2));
        assert_eq!(money("19.9"), Decimal::new(1990, 2));
        assert_eq!(money("abc"), Decimal::ZERO);
        assert_eq!(optional_money("  "), None);
        assert_eq!(optional_money("0"), Some(Decimal::ZERO));
    }
}
