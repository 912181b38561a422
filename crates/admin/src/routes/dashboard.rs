//! Dashboard route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;
use vitrine_core::OrderStatus;

use super::orders::OrderSummaryView;
use crate::error::Result;
use crate::middleware::AdminToken;
use crate::state::AppState;

/// Latest orders shown on the dashboard.
const RECENT_ORDERS: usize = 5;

/// Dashboard payload.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub pending_orders: u64,
    pub recent_orders: Vec<OrderSummaryView>,
}

/// Dashboard overview.
#[instrument(skip(state, token))]
pub async fn index(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
) -> Result<Json<DashboardView>> {
    let pending = state
        .backend()
        .list_orders(&token, Some(OrderStatus::Pending), 1)
        .await?;
    let recent = state.backend().list_orders(&token, None, 1).await?;

    Ok(Json(DashboardView {
        pending_orders: pending.total,
        recent_orders: recent
            .items
            .iter()
            .take(RECENT_ORDERS)
            .map(OrderSummaryView::from)
            .collect(),
    }))
}
