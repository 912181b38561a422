//! Cart route handlers.
//!
//! The cart is stored in the visitor's session and re-saved after every
//! mutation. Product prices are read from the backend when a line is added.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use vitrine_core::format::format_decimal_brl;
use vitrine_core::{Cart, CartLine, ProductId};

use crate::backend::BackendError;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::session::keys;
use crate::state::AppState;

/// Cart item display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: Option<String>,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            quantity: line.quantity,
            price: format_decimal_brl(line.unit_price),
            line_price: format_decimal_brl(line.line_total()),
            image_url: line.image_url.clone(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub coupon: Option<String>,
    pub subtotal: String,
    pub discount: String,
    pub total: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            coupon: cart.coupon().map(|c| c.code.clone()),
            subtotal: format_decimal_brl(cart.subtotal()),
            discount: format_decimal_brl(cart.discount()),
            total: format_decimal_brl(cart.total()),
            item_count: cart.item_count(),
        }
    }
}

/// Cart count badge payload.
#[derive(Debug, Clone, Serialize)]
pub struct CartCount {
    pub count: u32,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session, or an empty cart.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Store the cart in the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(keys::CART, cart).await?;
    Ok(())
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update cart request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Apply coupon request body.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    pub code: String,
}

/// Display cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    if cart.drop_expired_coupon(Utc::now().date_naive()).is_some() {
        save_cart(&session, &cart).await?;
    }
    Ok(Json(CartView::from(&cart)))
}

/// Add a product to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartView>> {
    let product = state.backend().get_product(form.product_id).await?;

    let mut cart = load_cart(&session).await?;
    cart.add(&product, form.quantity.unwrap_or(1))?;
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added product to cart",
        Some(&[("product_id", form.product_id.to_string().as_str())]),
    );

    Ok(Json(CartView::from(&cart)))
}

/// Change a line quantity; zero removes the line.
#[instrument(skip(session))]
pub async fn update(session: Session, Json(form): Json<UpdateCartForm>) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.set_quantity(form.product_id, form.quantity)?;
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Remove a line.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.remove(form.product_id)?;
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Validate a coupon with the backend and apply it.
#[instrument(skip(state, session))]
pub async fn apply_coupon(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CouponForm>,
) -> Result<Json<CartView>> {
    let code = form.code.trim();
    if code.is_empty() {
        return Err(AppError::BadRequest("Informe o código do cupom".to_string()));
    }

    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Carrinho vazio".to_string()));
    }

    let coupon = match state.backend().validate_coupon(code).await {
        Ok(coupon) => coupon,
        Err(BackendError::NotFound(_)) => {
            return Err(AppError::BadRequest("Cupom inválido".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    cart.apply_coupon(coupon, Utc::now().date_naive())?;
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Remove the applied coupon.
#[instrument(skip(session))]
pub async fn remove_coupon(session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    if cart.remove_coupon().is_some() {
        save_cart(&session, &cart).await?;
    }
    Ok(Json(CartView::from(&cart)))
}

/// Number of units in the cart.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCount {
        count: cart.item_count(),
    }))
}
