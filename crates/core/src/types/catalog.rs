//! Catalog entities: products, categories and services.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::default_true;
use super::id::{CategoryId, ProductId, ServiceId};
use super::money::{decimal_or_zero, optional_decimal};
use crate::stock::resolve_stock_value;

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A product as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(default, alias = "descricao")]
    pub description: Option<String>,
    #[serde(default, alias = "preco", deserialize_with = "decimal_or_zero")]
    pub price: Decimal,
    #[serde(
        default,
        alias = "preco_promocional",
        alias = "promo_price",
        deserialize_with = "optional_decimal"
    )]
    pub promotional_price: Option<Decimal>,
    #[serde(default, alias = "imagem", alias = "image")]
    pub image_url: Option<String>,
    #[serde(default, alias = "imagens")]
    pub images: Vec<String>,
    #[serde(default, alias = "categoria_id")]
    pub category_id: Option<CategoryId>,
    #[serde(default, alias = "categoria")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub stock: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub quantity: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub estoque: Value,
    #[serde(default = "default_true", alias = "ativo")]
    pub active: bool,
    #[serde(default, alias = "criado_em")]
    pub created_at: Option<String>,
}

impl Product {
    /// Stock on hand, read from the first of `stock`, `quantity` and
    /// `estoque` that holds a number.
    #[must_use]
    pub fn stock(&self) -> Option<f64> {
        resolve_stock_value([&self.stock, &self.quantity, &self.estoque])
    }

    /// Whether the product can be added to a cart.
    ///
    /// Products without any stock information are treated as available.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.active && self.stock().is_none_or(|qty| qty > 0.0)
    }

    /// Whether a promotional price below the regular price is set.
    #[must_use]
    pub fn is_on_promo(&self) -> bool {
        self.promotional_price
            .is_some_and(|promo| promo > Decimal::ZERO && promo < self.price)
    }

    /// Price the customer pays.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.promotional_price {
            Some(promo) if self.is_on_promo() => promo,
            _ => self.price,
        }
    }

    /// Promotional discount as a whole percentage of the regular price.
    #[must_use]
    pub fn discount_percentage(&self) -> Option<Decimal> {
        if !self.is_on_promo() || self.price.is_zero() {
            return None;
        }
        let off = (self.price - self.effective_price()) / self.price * Decimal::ONE_HUNDRED;
        Some(off.round())
    }

    /// First image, falling back to the gallery.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .or_else(|| self.images.first().map(String::as_str))
    }
}

/// A bookable service listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    #[serde(alias = "nome", alias = "titulo")]
    pub name: String,
    #[serde(default, alias = "descricao")]
    pub description: Option<String>,
    /// `None` for "price on request" listings.
    #[serde(default, alias = "preco", deserialize_with = "optional_decimal")]
    pub price: Option<Decimal>,
    #[serde(default, alias = "imagem", alias = "image")]
    pub image_url: Option<String>,
    #[serde(default, alias = "duracao")]
    pub duration: Option<String>,
    #[serde(default, alias = "categoria")]
    pub category: Option<String>,
    #[serde(default, alias = "contato", alias = "whatsapp")]
    pub contact: Option<String>,
    #[serde(default = "default_true", alias = "ativo")]
    pub active: bool,
}
