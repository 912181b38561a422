//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;
use vitrine_core::format::{format_date_br, format_decimal_brl};
use vitrine_core::{Category, Product, ProductId};

use super::{ListQuery, PageView};
use crate::error::Result;
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Price the customer pays, formatted.
    pub price: String,
    /// Regular price, only when a promotion applies.
    pub original_price: Option<String>,
    /// Promotional discount, e.g. `-15%`.
    pub discount: Option<String>,
    pub on_promo: bool,
    pub in_stock: bool,
    pub stock: Option<f64>,
    pub image_url: Option<String>,
    pub images: Vec<String>,
    pub category: Option<String>,
    pub created_at: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let on_promo = product.is_on_promo();
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_decimal_brl(product.effective_price()),
            original_price: on_promo.then(|| format_decimal_brl(product.price)),
            discount: product.discount_percentage().map(|pct| format!("-{pct}%")),
            on_promo,
            in_stock: product.in_stock(),
            stock: product.stock(),
            image_url: product.primary_image().map(String::from),
            images: product.images.clone(),
            category: product.category.as_ref().map(|c| c.name.clone()),
            created_at: product
                .created_at
                .as_deref()
                .map(format_date_br)
                .filter(|d| !d.is_empty()),
        }
    }
}

/// Product listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PageView<ProductView>>> {
    let filter = query.into_filter()?;
    let page = state.backend().list_products(&filter).await?;
    Ok(Json(PageView::from_page(&page, |p| ProductView::from(p))))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let product = state.backend().get_product(id).await?;
    Ok(Json(ProductView::from(&product)))
}

/// Category listing.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.backend().list_categories().await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_view_promo() {
        let product: Product = serde_json::from_value(json!({
            "id": 7,
            "nome": "Café torrado 500g",
            "preco": "40,00",
            "preco_promocional": "34,00",
            "estoque": 3,
            "categoria": {"id": 1, "nome": "Mercearia"},
            "criado_em": "2024-03-09T10:00:00Z"
        }))
        .unwrap();

        let view = ProductView::from(&product);
        assert_eq!(view.price, "R$ 34,00");
        assert_eq!(view.original_price.as_deref(), Some("R$ 40,00"));
        assert_eq!(view.discount.as_deref(), Some("-15%"));
        assert!(view.in_stock);
        assert_eq!(view.category.as_deref(), Some("Mercearia"));
        assert_eq!(view.created_at.as_deref(), Some("09/03/2024"));
    }

    #[test]
    fn test_product_view_regular_price() {
        let product: Product =
            serde_json::from_value(json!({"id": 1, "name": "Mel", "price": 1234.5, "stock": "0"}))
                .unwrap();
        let view = ProductView::from(&product);
        assert_eq!(view.price, "R$ 1.234,50");
        assert_eq!(view.original_price, None);
        assert_eq!(view.discount, None);
        assert!(!view.in_stock);
        assert_eq!(view.created_at, None);
    }
}
