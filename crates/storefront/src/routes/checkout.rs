//! Checkout handler.
//!
//! Validates the customer and address form, turns the session cart into an
//! order on the backend and clears the cart on success.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{Instrument, instrument};
use vitrine_core::format::{
    DocumentKind, digits_only, format_date_br, format_decimal_brl, is_valid_cpf, mask_cep,
    mask_document, mask_phone,
};
use vitrine_core::{
    Cart, CartError, CustomerInfo, Email, NewOrder, Order, OrderId, UserAddress,
};

use super::cart::{load_cart, save_cart};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::session::keys;
use crate::state::AppState;

/// Seconds a started checkout blocks another one from the same session.
pub const CHECKOUT_LOCK_SECONDS: i64 = 60;

/// Whether a checkout started at unix time `started_at` still holds the lock
/// at `now`.
#[must_use]
pub const fn checkout_locked(started_at: Option<i64>, now: i64) -> bool {
    match started_at {
        Some(started_at) => now.saturating_sub(started_at) < CHECKOUT_LOCK_SECONDS,
        None => false,
    }
}

/// Checkout request body, as typed by the customer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    #[serde(alias = "document")]
    pub cpf: String,
    pub phone: String,
    pub cep: String,
    pub street: String,
    pub number: String,
    #[serde(default)]
    pub complement: Option<String>,
    #[serde(default)]
    pub district: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub notes: Option<String>,
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

impl CheckoutForm {
    /// Normalize and validate the form.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` naming the first invalid field.
    pub fn validate(&self) -> Result<(CustomerInfo, UserAddress)> {
        let name = required(&self.name, "Informe o nome")?;

        let email = Email::parse(&self.email)
            .map_err(|_| AppError::BadRequest("E-mail inválido".to_string()))?;

        let document = mask_document(&self.cpf, DocumentKind::Cpf);
        if !is_valid_cpf(&document) {
            return Err(AppError::BadRequest("CPF inválido".to_string()));
        }

        let phone = mask_phone(&self.phone);
        if !(10..=11).contains(&digits_only(&phone).len()) {
            return Err(AppError::BadRequest("Telefone inválido".to_string()));
        }

        let cep = mask_cep(&self.cep);
        if digits_only(&cep).len() != 8 {
            return Err(AppError::BadRequest("CEP inválido".to_string()));
        }

        let state = self.state.trim().to_uppercase();
        if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::BadRequest("UF inválida".to_string()));
        }

        let address = UserAddress {
            id: None,
            cep,
            street: required(&self.street, "Informe o endereço")?,
            number: required(&self.number, "Informe o número")?,
            complement: non_blank(self.complement.as_deref()),
            district: self.district.trim().to_string(),
            city: required(&self.city, "Informe a cidade")?,
            state,
        };

        let customer = CustomerInfo {
            name,
            email,
            document,
            phone,
        };

        Ok((customer, address))
    }
}

/// Build the backend payload from a validated form and the cart.
#[must_use]
pub fn build_order(
    customer: CustomerInfo,
    address: UserAddress,
    cart: &Cart,
    notes: Option<String>,
) -> NewOrder {
    NewOrder {
        customer,
        address,
        items: cart.order_items(),
        coupon_code: cart.coupon().map(|c| c.code.clone()),
        subtotal: cart.subtotal(),
        discount: cart.discount(),
        total: cart.total(),
        notes,
    }
}

/// Order confirmation payload.
#[derive(Debug, Clone, Serialize)]
pub struct OrderConfirmationView {
    pub id: OrderId,
    pub status: String,
    pub total: String,
    pub created_at: Option<String>,
}

impl From<&Order> for OrderConfirmationView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            status: order.status.label().to_string(),
            total: format_decimal_brl(order.total),
            created_at: order
                .created_at
                .as_deref()
                .map(format_date_br)
                .filter(|d| !d.is_empty()),
        }
    }
}

/// Release the checkout lock and, once the order exists, empty the cart.
///
/// Saved explicitly because the session layer never sees a request whose
/// client went away.
async fn finish_checkout(session: &Session, placed: bool) -> Result<()> {
    session.remove_value(keys::CHECKOUT_IN_FLIGHT).await?;
    if placed {
        session.remove_value(keys::CART).await?;
    }
    session.save().await?;
    Ok(())
}

/// Place the order.
///
/// A second submission from the same session while the first is still
/// waiting on the backend gets 409. The backend call runs on its own task so
/// the lock is released even if the customer disconnects; a lock older than
/// [`CHECKOUT_LOCK_SECONDS`] is ignored.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<(StatusCode, Json<OrderConfirmationView>)> {
    let (customer, address) = form.validate()?;

    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Carrinho vazio".to_string()));
    }
    if let Some(expired) = cart.drop_expired_coupon(Utc::now().date_naive()) {
        save_cart(&session, &cart).await?;
        return Err(CartError::CouponExpired(expired.code).into());
    }

    let now = Utc::now().timestamp();
    if checkout_locked(session.get::<i64>(keys::CHECKOUT_IN_FLIGHT).await?, now) {
        return Err(AppError::Conflict(
            "Pedido já está sendo processado".to_string(),
        ));
    }
    session.insert(keys::CHECKOUT_IN_FLIGHT, now).await?;
    session.save().await?;

    let order = build_order(
        customer,
        address,
        &cart,
        non_blank(form.notes.as_deref()),
    );

    let task_session = session.clone();
    let created = tokio::spawn(async move {
        let result = state.backend().create_order(&order).await;
        finish_checkout(&task_session, result.is_ok()).await?;
        Ok::<_, AppError>(result?)
    }
    .in_current_span())
    .await
    .map_err(|e| AppError::Internal(format!("Checkout task failed: {e}")))??;

    tracing::info!(order_id = %created.id, "Order placed");
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", created.id.to_string().as_str())]),
    );

    Ok((
        StatusCode::CREATED,
        Json(OrderConfirmationView::from(&created)),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde_json::json;
    use vitrine_core::{Coupon, CouponKind, Product};

    use super::*;

    fn form() -> CheckoutForm {
        CheckoutForm {
            name: " Maria Silva ".to_string(),
            email: " Maria@Exemplo.com.BR ".to_string(),
            cpf: "52998224725".to_string(),
            phone: "43999998888".to_string(),
            cep: "86010-000".to_string(),
            street: "Rua Sergipe".to_string(),
            number: "100".to_string(),
            complement: Some("  ".to_string()),
            district: "Centro".to_string(),
            city: "Londrina".to_string(),
            state: "pr".to_string(),
            notes: None,
        }
    }

    fn bad_request_message(form: &CheckoutForm) -> String {
        match form.validate() {
            Err(AppError::BadRequest(msg)) => msg,
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let (customer, address) = form().validate().unwrap();
        assert_eq!(customer.name, "Maria Silva");
        assert_eq!(customer.email.as_str(), "maria@exemplo.com.br");
        assert_eq!(customer.document, "529.982.247-25");
        assert_eq!(customer.phone, "(43) 99999-8888");
        assert_eq!(address.cep, "86010-000");
        assert_eq!(address.state, "PR");
        assert_eq!(address.complement, None);
    }

    #[test]
    fn test_validate_rejects_invalid_fields() {
        let mut f = form();
        f.name = "   ".to_string();
        assert_eq!(bad_request_message(&f), "Informe o nome");

        let mut f = form();
        f.email = "maria.exemplo.com".to_string();
        assert_eq!(bad_request_message(&f), "E-mail inválido");

        let mut f = form();
        f.cpf = "111.111.111-11".to_string();
        assert_eq!(bad_request_message(&f), "CPF inválido");

        let mut f = form();
        f.phone = "9999-888".to_string();
        assert_eq!(bad_request_message(&f), "Telefone inválido");

        let mut f = form();
        f.cep = "8601".to_string();
        assert_eq!(bad_request_message(&f), "CEP inválido");

        let mut f = form();
        f.state = "Paraná".to_string();
        assert_eq!(bad_request_message(&f), "UF inválida");
    }

    #[test]
    fn test_landline_phone_accepted() {
        let mut f = form();
        f.phone = "4333224455".to_string();
        let (customer, _) = f.validate().unwrap();
        assert_eq!(customer.phone, "(43) 3322-4455");
    }

    #[test]
    fn test_build_order_totals() {
        let product: Product =
            serde_json::from_value(json!({"id": 1, "nome": "Café", "preco": "50,00"})).unwrap();
        let mut cart = Cart::new();
        cart.add(&product, 2).unwrap();
        let coupon = Coupon {
            id: None,
            code: "DEZ".to_string(),
            kind: CouponKind::Percent,
            value: Decimal::new(10, 0),
            minimum_order: None,
            active: true,
            expires_at: None,
        };
        cart.apply_coupon(coupon, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
            .unwrap();

        let (customer, address) = form().validate().unwrap();
        let order = build_order(customer, address, &cart, Some("Portão azul".to_string()));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.subtotal, Decimal::new(100, 0));
        assert_eq!(order.discount, Decimal::new(10, 0));
        assert_eq!(order.total, Decimal::new(90, 0));
        assert_eq!(order.coupon_code.as_deref(), Some("DEZ"));
    }

    #[test]
    fn test_checkout_lock_expires() {
        let now = 1_720_000_000;
        assert!(!checkout_locked(None, now));
        assert!(checkout_locked(Some(now), now));
        assert!(checkout_locked(Some(now - CHECKOUT_LOCK_SECONDS + 1), now));
        assert!(!checkout_locked(Some(now - CHECKOUT_LOCK_SECONDS), now));
        // Clock moved backwards
        assert!(checkout_locked(Some(now + 5), now));
    }
}
