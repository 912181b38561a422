//! Service listing handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;
use vitrine_core::format::format_decimal_brl;
use vitrine_core::{Service, ServiceId};

use super::{ListQuery, PageView};
use crate::error::Result;
use crate::state::AppState;

/// Shown instead of a price for services quoted individually.
const PRICE_ON_REQUEST: &str = "Sob consulta";

/// Service display data.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceView {
    pub id: ServiceId,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub image_url: Option<String>,
    pub duration: Option<String>,
    pub category: Option<String>,
    pub contact: Option<String>,
}

impl From<&Service> for ServiceView {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id,
            name: service.name.clone(),
            description: service.description.clone(),
            price: service
                .price
                .filter(|p| !p.is_zero())
                .map_or_else(|| PRICE_ON_REQUEST.to_string(), format_decimal_brl),
            image_url: service.image_url.clone(),
            duration: service.duration.clone(),
            category: service.category.clone(),
            contact: service.contact.clone(),
        }
    }
}

/// Service listing. Inactive services are hidden.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PageView<ServiceView>>> {
    let filter = query.into_filter()?;
    let mut page = state.backend().list_services(&filter).await?;
    page.items.retain(|s| s.active);
    Ok(Json(PageView::from_page(&page, |s| ServiceView::from(s))))
}

/// Service detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ServiceId>,
) -> Result<Json<ServiceView>> {
    let service = state.backend().get_service(id).await?;
    Ok(Json(ServiceView::from(&service)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_service_view_price() {
        let priced: Service =
            serde_json::from_value(json!({"id": 1, "nome": "Frete", "preco": "25,9"})).unwrap();
        assert_eq!(ServiceView::from(&priced).price, "R$ 25,90");

        let quoted: Service =
            serde_json::from_value(json!({"id": 2, "nome": "Instalação"})).unwrap();
        assert_eq!(ServiceView::from(&quoted).price, PRICE_ON_REQUEST);
    }
}
