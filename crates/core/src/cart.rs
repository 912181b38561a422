//! Shopping cart arithmetic.
//!
//! The cart is a plain value: the storefront keeps it in the visitor's
//! session and re-saves it after every mutation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Coupon, NewOrderItem, Product, ProductId};

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantity was zero where a positive amount is required.
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    /// Quantity above [`MAX_LINE_QUANTITY`].
    #[error("quantity must be at most {max}")]
    QuantityTooLarge {
        /// Maximum allowed quantity per line.
        max: u32,
    },
    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),
    /// The product is inactive or out of stock.
    #[error("product {0} is unavailable")]
    Unavailable(ProductId),
    /// The coupon cannot be applied to the current subtotal.
    #[error("coupon {0} does not apply to this cart")]
    CouponNotApplicable(String),
    /// The coupon's expiry date has passed.
    #[error("coupon {0} has expired")]
    CouponExpired(String),
}

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub image_url: Option<String>,
}

impl CartLine {
    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    coupon: Option<Coupon>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Applied coupon, if any.
    #[must_use]
    pub const fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// The line keeps the product's current effective price.
    ///
    /// # Errors
    ///
    /// Fails if the product is unavailable, the quantity is zero, or the
    /// merged quantity would exceed [`MAX_LINE_QUANTITY`].
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<&CartLine, CartError> {
        if !product.in_stock() {
            return Err(CartError::Unavailable(product.id));
        }
        validate_quantity(quantity)?;

        let index = match self.position(product.id) {
            Some(index) => {
                let line = self
                    .lines
                    .get_mut(index)
                    .ok_or(CartError::NotInCart(product.id))?;
                let merged = line.quantity.saturating_add(quantity);
                validate_quantity(merged)?;
                line.quantity = merged;
                line.unit_price = product.effective_price();
                index
            }
            None => {
                self.lines.push(CartLine {
                    product_id: product.id,
                    name: product.name.clone(),
                    unit_price: product.effective_price(),
                    quantity,
                    image_url: product.primary_image().map(ToString::to_string),
                });
                self.lines.len() - 1
            }
        };

        self.drop_inapplicable_coupon();
        self.lines.get(index).ok_or(CartError::NotInCart(product.id))
    }

    /// Set the quantity of an existing line; zero removes it.
    ///
    /// # Errors
    ///
    /// Fails if the product is not in the cart or the quantity is too large.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> Result<(), CartError> {
        let index = self
            .position(product_id)
            .ok_or(CartError::NotInCart(product_id))?;

        if quantity == 0 {
            self.lines.remove(index);
        } else {
            validate_quantity(quantity)?;
            if let Some(line) = self.lines.get_mut(index) {
                line.quantity = quantity;
            }
        }

        self.drop_inapplicable_coupon();
        Ok(())
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Fails if the product is not in the cart.
    pub fn remove(&mut self, product_id: ProductId) -> Result<CartLine, CartError> {
        let index = self
            .position(product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        let line = self.lines.remove(index);
        self.drop_inapplicable_coupon();
        Ok(line)
    }

    /// Remove every line and the coupon.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.coupon = None;
    }

    /// Apply a coupon to the cart, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Fails if the coupon expired before `today` or does not apply to the
    /// current subtotal.
    pub fn apply_coupon(
        &mut self,
        coupon: Coupon,
        today: NaiveDate,
    ) -> Result<Decimal, CartError> {
        if coupon.is_expired(today) {
            return Err(CartError::CouponExpired(coupon.code));
        }
        if !coupon.applies_to(self.subtotal()) {
            return Err(CartError::CouponNotApplicable(coupon.code));
        }
        self.coupon = Some(coupon);
        Ok(self.discount())
    }

    /// Drop the applied coupon if it expired before `today`, returning it.
    pub fn drop_expired_coupon(&mut self, today: NaiveDate) -> Option<Coupon> {
        if self.coupon.as_ref().is_some_and(|c| c.is_expired(today)) {
            return self.coupon.take();
        }
        None
    }

    /// Remove the applied coupon.
    pub fn remove_coupon(&mut self) -> Option<Coupon> {
        self.coupon.take()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Discount granted by the applied coupon.
    #[must_use]
    pub fn discount(&self) -> Decimal {
        self.coupon
            .as_ref()
            .map_or(Decimal::ZERO, |c| c.discount_for(self.subtotal()))
    }

    /// Amount due, never negative.
    #[must_use]
    pub fn total(&self) -> Decimal {
        (self.subtotal() - self.discount()).max(Decimal::ZERO)
    }

    /// Lines as order items for checkout.
    #[must_use]
    pub fn order_items(&self) -> Vec<NewOrderItem> {
        self.lines
            .iter()
            .map(|line| NewOrderItem {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }

    /// A coupon whose minimum is no longer met is dropped rather than kept
    /// silently granting nothing.
    fn drop_inapplicable_coupon(&mut self) {
        let subtotal = self.subtotal();
        if self.coupon.as_ref().is_some_and(|c| !c.applies_to(subtotal)) {
            self.coupon = None;
        }
    }
}

const fn validate_quantity(quantity: u32) -> Result<(), CartError> {
    if quantity == 0 {
        return Err(CartError::InvalidQuantity);
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(CartError::QuantityTooLarge {
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}
