//! HTTP route handlers for storefront.
//!
//! Every handler answers with JSON views whose prices and dates are already
//! formatted for display (`R$ 1.234,56`, `DD/MM/YYYY`).
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home: newest products, promotions, news
//!
//! # Catalog
//! GET  /products               - Product listing (search, categories, price range, promo, sort)
//! GET  /products/{id}          - Product detail
//! GET  /categories             - Category listing
//! GET  /services               - Service listing
//! GET  /services/{id}          - Service detail
//!
//! # News
//! GET  /news                   - Weather, quotes and latest posts
//! GET  /news/posts             - Post listing
//! GET  /news/posts/{slug}      - Post detail
//!
//! # Cart (session)
//! GET    /cart                 - Cart contents
//! POST   /cart/add             - Add a product
//! POST   /cart/update          - Change a line quantity (0 removes)
//! POST   /cart/remove          - Remove a line
//! POST   /cart/coupon          - Apply a coupon
//! DELETE /cart/coupon          - Remove the coupon
//! GET    /cart/count           - Number of units in the cart
//!
//! # Checkout
//! POST /checkout               - Place the order
//! ```

pub mod cart;
pub mod checkout;
pub mod home;
pub mod news;
pub mod products;
pub mod services;

use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use vitrine_core::format::parse_locale_number;
use vitrine_core::{ListFilter, Page, SortKey, parse_id_list};

use crate::error::AppError;
use crate::middleware::checkout_rate_limiter;
use crate::state::AppState;

/// Largest page size a visitor may request.
pub const MAX_PAGE_SIZE: u32 = 60;

/// A page of display items plus paging metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
}

impl<T> PageView<T> {
    /// Build a view from a backend page, converting each item.
    pub fn from_page<U>(page: &Page<U>, convert: impl FnMut(&U) -> T) -> Self {
        Self {
            items: page.items.iter().map(convert).collect(),
            page: page.page,
            total: page.total,
            total_pages: page.total_pages(),
            has_next_page: page.has_next_page(),
        }
    }
}

/// Listing query parameters as typed by visitors.
///
/// Prices accept pt-BR input (`1.234,56`); categories are a comma separated
/// list of ids.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub categories: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub promo: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    /// Validate and convert into a backend filter.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for unparseable prices or sort keys.
    pub fn into_filter(self) -> Result<ListFilter, AppError> {
        let categories = [self.categories.as_deref(), self.category.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(",");

        let sort = self
            .sort
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<SortKey>()
                    .map_err(|_| AppError::BadRequest(format!("Ordenação inválida: {s}")))
            })
            .transpose()?;

        Ok(ListFilter {
            search: self.search,
            categories: parse_id_list(&categories),
            min_price: parse_price(self.min_price.as_deref(), "Preço mínimo inválido")?,
            max_price: parse_price(self.max_price.as_deref(), "Preço máximo inválido")?,
            promo: self
                .promo
                .as_deref()
                .is_some_and(|p| matches!(p.trim(), "1" | "true" | "on" | "sim")),
            sort,
            page: self.page,
            limit: self.limit.map(|l| l.min(MAX_PAGE_SIZE)),
        })
    }
}

fn parse_price(raw: Option<&str>, message: &str) -> Result<Option<f64>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => parse_locale_number(value)
            .filter(|v| *v >= 0.0)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(message.to_string())),
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the service routes router.
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(services::index))
        .route("/{id}", get(services::show))
}

/// Create the news routes router.
pub fn news_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(news::index))
        .route("/posts", get(news::posts))
        .route("/posts/{slug}", get(news::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
        .route(
            "/coupon",
            post(cart::apply_coupon)
                .delete(cart::remove_coupon)
                .layer(checkout_rate_limiter()),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .route("/categories", get(products::categories))
        .nest("/services", service_routes())
        .nest("/news", news_routes())
        .nest("/cart", cart_routes())
        .route(
            "/checkout",
            post(checkout::submit).layer(checkout_rate_limiter()),
        )
}
