//! Core types for Vitrine.
//!
//! Data-transfer shapes mirrored from the backend API plus a few type-safe
//! wrappers. Backend payloads mix English and Portuguese field names, so the
//! structs accept both spellings through serde aliases.

pub mod catalog;
pub mod commerce;
pub mod email;
pub mod id;
pub mod money;
pub mod news;
pub mod page;
pub mod status;

pub use catalog::{Category, Product, Service};
pub use commerce::{
    Coupon, CouponKind, CustomerInfo, NewOrder, NewOrderItem, Order, OrderItem, UserAddress,
};
pub use email::{Email, EmailError};
pub use id::*;
pub use news::{NewsPost, QuoteItem, WeatherItem};
pub use page::Page;
pub use status::OrderStatus;

/// Serde default for `active`-style flags the backend may omit.
pub(crate) const fn default_true() -> bool {
    true
}
