//! Vitrine Core - Shared types and input-normalization utilities.
//!
//! This crate provides common types used across all Vitrine components:
//! - `storefront` - Public-facing catalog, cart and checkout service
//! - `admin` - Back-office for products, services, orders and news
//! - `cli` - Command-line access to the formatters and the catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Backend data shapes, type-safe IDs, e-mail and money
//! - [`format`] - Masks, locale number parsing, BRL currency and date output
//! - [`query`] - Query-string construction for backend list endpoints
//! - [`stock`] - First-parseable stock value resolution
//! - [`cart`] - In-memory shopping cart arithmetic

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod format;
pub mod query;
pub mod stock;
pub mod types;

pub use cart::{Cart, CartError, CartLine};
pub use query::{ListFilter, SortKey, build_query_string, parse_id_list};
pub use stock::resolve_stock_value;
pub use types::*;
