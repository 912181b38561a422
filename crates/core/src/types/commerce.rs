//! Orders, coupons and customer addresses.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::default_true;
use super::email::Email;
use super::id::{AddressId, CouponId, OrderId, ProductId};
use super::money::{decimal_or_zero, optional_decimal};
use super::status::OrderStatus;
use crate::format::date::parse_date;

/// How a coupon's value is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    /// `value` is a percentage of the subtotal.
    #[serde(alias = "percentual", alias = "percentage")]
    Percent,
    /// `value` is a fixed amount in reais.
    #[serde(alias = "fixo", alias = "valor")]
    Fixed,
}

/// A discount coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    #[serde(default)]
    pub id: Option<CouponId>,
    #[serde(alias = "codigo")]
    pub code: String,
    #[serde(alias = "tipo")]
    pub kind: CouponKind,
    #[serde(alias = "valor", deserialize_with = "decimal_or_zero")]
    pub value: Decimal,
    #[serde(
        default,
        alias = "valor_minimo",
        alias = "min_order",
        deserialize_with = "optional_decimal"
    )]
    pub minimum_order: Option<Decimal>,
    #[serde(default = "default_true", alias = "ativo")]
    pub active: bool,
    #[serde(default, alias = "expira_em", alias = "validade")]
    pub expires_at: Option<String>,
}

impl Coupon {
    /// Normalize a user-typed coupon code for lookup.
    #[must_use]
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// Whether the expiry date lies before `today`.
    ///
    /// Coupons without a readable expiry date never expire here; the backend
    /// still has the last word when it is asked for the code.
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expires_at
            .as_deref()
            .and_then(parse_date)
            .is_some_and(|expiry| expiry < today)
    }

    /// Whether the coupon can be applied to an order of `subtotal`.
    #[must_use]
    pub fn applies_to(&self, subtotal: Decimal) -> bool {
        self.active
            && subtotal > Decimal::ZERO
            && self.minimum_order.is_none_or(|min| subtotal >= min)
    }

    /// Discount granted on `subtotal`, never more than the subtotal itself.
    #[must_use]
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        if !self.applies_to(subtotal) || self.value <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let raw = match self.kind {
            CouponKind::Percent => {
                let pct = self.value.min(Decimal::ONE_HUNDRED);
                (subtotal * pct / Decimal::ONE_HUNDRED).round_dp(2)
            }
            CouponKind::Fixed => self.value,
        };
        raw.min(subtotal)
    }
}

/// A delivery address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAddress {
    #[serde(default)]
    pub id: Option<AddressId>,
    #[serde(default)]
    pub cep: String,
    #[serde(default, alias = "logradouro", alias = "rua")]
    pub street: String,
    #[serde(default, alias = "numero")]
    pub number: String,
    #[serde(default, alias = "complemento")]
    pub complement: Option<String>,
    #[serde(default, alias = "bairro")]
    pub district: String,
    #[serde(default, alias = "cidade")]
    pub city: String,
    #[serde(default, alias = "uf", alias = "estado")]
    pub state: String,
}

impl UserAddress {
    /// Single-line rendering for order summaries.
    #[must_use]
    pub fn one_line(&self) -> String {
        let mut out = format!("{}, {}", self.street, self.number);
        if let Some(complement) = self.complement.as_deref().filter(|c| !c.trim().is_empty()) {
            out.push_str(" - ");
            out.push_str(complement.trim());
        }
        out.push_str(&format!(
            " - {}, {}/{} - CEP {}",
            self.district, self.city, self.state, self.cep
        ));
        out
    }
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(alias = "produto_id")]
    pub product_id: ProductId,
    #[serde(default, alias = "nome")]
    pub name: String,
    #[serde(alias = "quantidade")]
    pub quantity: u32,
    #[serde(default, alias = "preco_unitario", deserialize_with = "decimal_or_zero")]
    pub unit_price: Decimal,
}

impl OrderItem {
    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A placed order as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default, alias = "cliente_nome", alias = "nome")]
    pub customer_name: String,
    #[serde(default, alias = "cliente_email", alias = "email")]
    pub customer_email: Option<String>,
    #[serde(default, alias = "cliente_telefone", alias = "telefone")]
    pub customer_phone: Option<String>,
    #[serde(default, alias = "cpf")]
    pub customer_document: Option<String>,
    #[serde(default, alias = "itens")]
    pub items: Vec<OrderItem>,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, alias = "endereco")]
    pub address: Option<UserAddress>,
    #[serde(default, alias = "cupom")]
    pub coupon_code: Option<String>,
    #[serde(default, alias = "criado_em")]
    pub created_at: Option<String>,
}

/// Customer identification captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: Email,
    /// Masked CPF (`000.000.000-00`).
    pub document: String,
    /// Masked phone (`(00) 00000-0000`).
    pub phone: String,
}

/// One line of an order being placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Checkout payload sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer: CustomerInfo,
    pub address: UserAddress,
    pub items: Vec<NewOrderItem>,
    pub coupon_code: Option<String>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub notes: Option<String>,
}
