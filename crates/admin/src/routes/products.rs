//! Product management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;
use vitrine_core::format::{format_decimal_brl, format_number_br, parse_percentage};
use vitrine_core::{ListFilter, Product, ProductId, parse_id_list, resolve_stock_value};

use super::{
    PageQuery, PageView, default_true, display_date, money, non_blank, optional_money, raw_text,
    required,
};
use crate::backend::ProductInput;
use crate::error::{AppError, Result};
use crate::middleware::AdminToken;
use crate::state::AppState;

/// Product row for the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct AdminProductView {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub promotional_price: Option<String>,
    pub discount: Option<String>,
    /// Stock on hand, or `None` when the backend reports none.
    pub stock: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub active: bool,
    pub created_at: Option<String>,
}

impl From<&Product> for AdminProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_decimal_brl(product.price),
            promotional_price: product
                .is_on_promo()
                .then(|| product.effective_price())
                .map(format_decimal_brl),
            discount: product.discount_percentage().map(|pct| format!("-{pct}%")),
            stock: product.stock().map(format_number_br),
            category: product.category.as_ref().map(|c| c.name.clone()),
            image_url: product.primary_image().map(String::from),
            active: product.active,
            created_at: display_date(product.created_at.as_deref()),
        }
    }
}

/// Product form data, as typed in the back office.
///
/// Money fields are pt-BR strings (`"1.234,56"`). Stock may arrive in any
/// of `stock`, `quantity` or `estoque`; the first that holds a number wins.
#[derive(Debug, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "raw_text")]
    pub price: String,
    #[serde(default, deserialize_with = "raw_text")]
    pub promotional_price: String,
    /// Discount such as `"15%"`, used when no promotional price is given.
    #[serde(default, deserialize_with = "raw_text")]
    pub discount_percentage: String,
    #[serde(default)]
    pub stock: Value,
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub estoque: Value,
    /// Comma-separated category ids.
    #[serde(default, deserialize_with = "raw_text")]
    pub categories: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl ProductForm {
    /// Validate the form and build the backend payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` naming the first invalid field.
    pub fn into_input(self) -> Result<ProductInput> {
        let name = required(&self.name, "Informe o nome do produto")?;

        let price = money(&self.price);
        if price <= Decimal::ZERO {
            return Err(AppError::BadRequest("Preço inválido".to_string()));
        }

        let promotional_price = match optional_money(&self.promotional_price) {
            Some(promo) => Some(promo),
            None if !self.discount_percentage.trim().is_empty() => {
                let pct = parse_percentage(&self.discount_percentage)
                    .filter(|p| *p > 0.0 && *p < 100.0)
                    .and_then(Decimal::from_f64_retain)
                    .ok_or_else(|| AppError::BadRequest("Desconto inválido".to_string()))?;
                Some((price * (Decimal::ONE_HUNDRED - pct) / Decimal::ONE_HUNDRED).round_dp(2))
            }
            None => None,
        };
        if promotional_price.is_some_and(|promo| promo <= Decimal::ZERO || promo >= price) {
            return Err(AppError::BadRequest(
                "Preço promocional deve ser menor que o preço".to_string(),
            ));
        }

        let stock = resolve_stock_value([&self.stock, &self.quantity, &self.estoque]);
        if stock.is_some_and(|s| s < 0.0) {
            return Err(AppError::BadRequest("Estoque inválido".to_string()));
        }

        let categories = parse_id_list(&self.categories);

        Ok(ProductInput {
            name,
            description: non_blank(self.description.as_deref()),
            price,
            promotional_price,
            stock,
            category_id: categories.first().copied(),
            categories,
            image_url: non_blank(self.image_url.as_deref()),
            active: self.active,
        })
    }
}

/// Product listing.
#[instrument(skip(state, token))]
pub async fn index(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageView<AdminProductView>>> {
    let filter = ListFilter {
        search: query.search,
        page: query.page,
        ..ListFilter::default()
    };
    let page = state.backend().list_products(&token, &filter).await?;
    Ok(Json(PageView::from_page(&page, |p| AdminProductView::from(p))))
}

/// Product detail.
#[instrument(skip(state, token))]
pub async fn show(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Path(id): Path<ProductId>,
) -> Result<Json<AdminProductView>> {
    let product = state.backend().get_product(&token, id).await?;
    Ok(Json(AdminProductView::from(&product)))
}

/// Create a product.
#[instrument(skip(state, token, form))]
pub async fn create(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Json(form): Json<ProductForm>,
) -> Result<(StatusCode, Json<AdminProductView>)> {
    let input = form.into_input()?;
    let product = state.backend().create_product(&token, &input).await?;
    tracing::info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(AdminProductView::from(&product))))
}

/// Update a product.
#[instrument(skip(state, token, form))]
pub async fn update(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Path(id): Path<ProductId>,
    Json(form): Json<ProductForm>,
) -> Result<Json<AdminProductView>> {
    let input = form.into_input()?;
    let product = state.backend().update_product(&token, id, &input).await?;
    tracing::info!(product_id = %id, "Product updated");
    Ok(Json(AdminProductView::from(&product)))
}

/// Delete a product.
#[instrument(skip(state, token))]
pub async fn destroy(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    state.backend().delete_product(&token, id).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
