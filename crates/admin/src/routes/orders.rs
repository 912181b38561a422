//! Order management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vitrine_core::format::format_decimal_brl;
use vitrine_core::{Order, OrderId, OrderItem, OrderStatus, ProductId};

use super::{PageView, display_date};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::AdminToken;
use crate::state::AppState;

/// Order listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
}

/// Parse an optional status filter; blank means "all".
fn parse_status_filter(raw: Option<&str>) -> Result<Option<OrderStatus>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<OrderStatus>()
            .map(Some)
            .map_err(|_| AppError::BadRequest("Status inválido".to_string())),
    }
}

/// A status as value and label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl From<OrderStatus> for StatusOption {
    fn from(status: OrderStatus) -> Self {
        Self {
            value: status.as_str(),
            label: status.label(),
        }
    }
}

/// Order row for the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummaryView {
    pub id: OrderId,
    pub customer_name: String,
    pub total: String,
    pub status: StatusOption,
    pub item_count: u32,
    pub created_at: Option<String>,
}

impl From<&Order> for OrderSummaryView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            customer_name: order.customer_name.clone(),
            total: format_decimal_brl(order.total),
            status: order.status.into(),
            item_count: order.items.iter().map(|i| i.quantity).sum(),
            created_at: display_date(order.created_at.as_deref()),
        }
    }
}

/// Order line display data.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: format_decimal_brl(item.unit_price),
            line_total: format_decimal_brl(item.line_total()),
        }
    }
}

/// Full order display data.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetailView {
    #[serde(flatten)]
    pub summary: OrderSummaryView,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_document: Option<String>,
    pub address: Option<String>,
    pub coupon_code: Option<String>,
    pub items: Vec<OrderItemView>,
    /// Statuses the order may move to next.
    pub next_statuses: Vec<StatusOption>,
}

impl From<&Order> for OrderDetailView {
    fn from(order: &Order) -> Self {
        Self {
            summary: OrderSummaryView::from(order),
            customer_email: order.customer_email.clone(),
            customer_phone: order.customer_phone.clone(),
            customer_document: order.customer_document.clone(),
            address: order.address.as_ref().map(vitrine_core::UserAddress::one_line),
            coupon_code: order.coupon_code.clone(),
            items: order.items.iter().map(OrderItemView::from).collect(),
            next_statuses: OrderStatus::ALL
                .into_iter()
                .filter(|next| order.status.can_transition_to(*next))
                .map(StatusOption::from)
                .collect(),
        }
    }
}

/// Status change request body.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Order listing.
#[instrument(skip(state, token))]
pub async fn index(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<PageView<OrderSummaryView>>> {
    let status = parse_status_filter(query.status.as_deref())?;
    let page = state
        .backend()
        .list_orders(&token, status, query.page.unwrap_or(1))
        .await?;
    Ok(Json(PageView::from_page(&page, |o| OrderSummaryView::from(o))))
}

/// Order detail.
#[instrument(skip(state, token))]
pub async fn show(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDetailView>> {
    let order = state.backend().get_order(&token, id).await?;
    Ok(Json(OrderDetailView::from(&order)))
}

/// Move an order to a new status.
///
/// Only forward moves through the lifecycle (or cancellation of an open
/// order) are accepted; anything else is a 409.
#[instrument(skip(state, token, form))]
pub async fn update_status(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Path(id): Path<OrderId>,
    Json(form): Json<StatusForm>,
) -> Result<Json<OrderDetailView>> {
    let next = parse_status_filter(Some(&form.status))?
        .ok_or_else(|| AppError::BadRequest("Informe o status".to_string()))?;

    let order = state.backend().get_order(&token, id).await?;
    if !order.status.can_transition_to(next) {
        return Err(AppError::Conflict(format!(
            "Pedido {} não pode passar de {} para {}",
            id,
            order.status.label(),
            next.label()
        )));
    }

    let updated = state.backend().update_order_status(&token, id, next).await?;

    tracing::info!(order_id = %id, from = %order.status, to = %next, "Order status changed");
    add_breadcrumb(
        "orders",
        "Order status changed",
        Some(&[("order_id", id.to_string().as_str()), ("status", next.as_str())]),
    );

    Ok(Json(OrderDetailView::from(&updated)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn order(status: &str) -> Order {
        serde_json::from_value(json!({
            "id": 42,
            "customer_name": "Maria Silva",
            "items": [
                {"product_id": 1, "name": "Café", "quantity": 2, "unit_price": "25,00"},
                {"product_id": 2, "name": "Mel", "quantity": 1, "unit_price": "40,00"}
            ],
            "total": "90,00",
            "status": status,
            "created_at": "2024-07-01T12:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("enviado")).unwrap(),
            Some(OrderStatus::Shipped)
        );
        assert!(matches!(
            parse_status_filter(Some("perdido")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_order_detail_view() {
        let view = OrderDetailView::from(&order("pago"));
        assert_eq!(view.summary.total, "R$ 90,00");
        assert_eq!(view.summary.item_count, 3);
        assert_eq!(view.summary.status.label, "Pago");
        assert_eq!(view.summary.created_at.as_deref(), Some("01/07/2024"));
        assert_eq!(view.items[0].line_total, "R$ 50,00");

        let next: Vec<&str> = view.next_statuses.iter().map(|s| s.value).collect();
        assert_eq!(next, ["processing", "shipped", "delivered", "cancelled"]);
    }

    #[test]
    fn test_final_order_has_no_next_status() {
        let view = OrderDetailView::from(&order("entregue"));
        assert!(view.next_statuses.is_empty());
    }
}
