//! Request bodies sent to the backend's admin endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vitrine_core::{CategoryId, CouponKind, OrderStatus};

/// Login request body.
#[derive(Debug, Serialize)]
pub(super) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Login response as sent by the backend.
#[derive(Debug, Deserialize)]
pub(super) struct LoginResponse {
    #[serde(alias = "access_token", alias = "accessToken")]
    pub token: String,
    #[serde(default, alias = "usuario")]
    pub user: Option<AdminUser>,
}

/// The signed-in back-office user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    #[serde(default, alias = "nome")]
    pub name: Option<String>,
    pub email: String,
}

/// Product create/update body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub promotional_price: Option<Decimal>,
    pub stock: Option<f64>,
    pub category_id: Option<CategoryId>,
    pub categories: Vec<CategoryId>,
    pub image_url: Option<String>,
    pub active: bool,
}

/// Service create/update body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceInput {
    pub name: String,
    pub description: Option<String>,
    /// `None` for services quoted individually.
    pub price: Option<Decimal>,
    pub duration: Option<String>,
    pub category: Option<String>,
    pub contact: Option<String>,
    pub image_url: Option<String>,
    pub active: bool,
}

/// Coupon create body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouponInput {
    pub code: String,
    pub kind: CouponKind,
    pub value: Decimal,
    pub minimum_order: Option<Decimal>,
    pub active: bool,
    pub expires_at: Option<String>,
}

/// News post create/update body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsPostInput {
    pub title: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub published: bool,
}

/// Order status change body.
#[derive(Debug, Clone, Copy, Serialize)]
pub(super) struct StatusUpdate {
    pub status: OrderStatus,
}
