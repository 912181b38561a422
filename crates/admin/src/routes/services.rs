//! Service management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vitrine_core::format::format_decimal_brl;
use vitrine_core::{ListFilter, Service, ServiceId};

use super::{
    PageQuery, PageView, default_true, non_blank, optional_money, raw_text, required,
};
use crate::backend::ServiceInput;
use crate::error::{AppError, Result};
use crate::middleware::AdminToken;
use crate::state::AppState;

/// Service row for the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct AdminServiceView {
    pub id: ServiceId,
    pub name: String,
    pub description: Option<String>,
    /// `None` for services quoted individually.
    pub price: Option<String>,
    pub duration: Option<String>,
    pub category: Option<String>,
    pub contact: Option<String>,
    pub active: bool,
}

impl From<&Service> for AdminServiceView {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id,
            name: service.name.clone(),
            description: service.description.clone(),
            price: service
                .price
                .filter(|p| !p.is_zero())
                .map(format_decimal_brl),
            duration: service.duration.clone(),
            category: service.category.clone(),
            contact: service.contact.clone(),
            active: service.active,
        }
    }
}

/// Service form data.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Blank or zero means "price on request".
    #[serde(default, deserialize_with = "raw_text")]
    pub price: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl ServiceForm {
    /// Validate the form and build the backend payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a missing name or a negative price.
    pub fn into_input(self) -> Result<ServiceInput> {
        let name = required(&self.name, "Informe o nome do serviço")?;

        let price = optional_money(&self.price);
        if price.is_some_and(|p| p < Decimal::ZERO) {
            return Err(AppError::BadRequest("Preço inválido".to_string()));
        }

        Ok(ServiceInput {
            name,
            description: non_blank(self.description.as_deref()),
            price: price.filter(|p| !p.is_zero()),
            duration: non_blank(self.duration.as_deref()),
            category: non_blank(self.category.as_deref()),
            contact: non_blank(self.contact.as_deref()),
            image_url: non_blank(self.image_url.as_deref()),
            active: self.active,
        })
    }
}

/// Service listing, inactive services included.
#[instrument(skip(state, token))]
pub async fn index(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageView<AdminServiceView>>> {
    let filter = ListFilter {
        search: query.search,
        page: query.page,
        ..ListFilter::default()
    };
    let page = state.backend().list_services(&token, &filter).await?;
    Ok(Json(PageView::from_page(&page, |s| AdminServiceView::from(s))))
}

/// Create a service.
#[instrument(skip(state, token, form))]
pub async fn create(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Json(form): Json<ServiceForm>,
) -> Result<(StatusCode, Json<AdminServiceView>)> {
    let input = form.into_input()?;
    let service = state.backend().create_service(&token, &input).await?;
    tracing::info!(service_id = %service.id, "Service created");
    Ok((StatusCode::CREATED, Json(AdminServiceView::from(&service))))
}

/// Update a service.
#[instrument(skip(state, token, form))]
pub async fn update(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Path(id): Path<ServiceId>,
    Json(form): Json<ServiceForm>,
) -> Result<Json<AdminServiceView>> {
    let input = form.into_input()?;
    let service = state.backend().update_service(&token, id, &input).await?;
    tracing::info!(service_id = %id, "Service updated");
    Ok(Json(AdminServiceView::from(&service)))
}

/// Delete a service.
#[instrument(skip(state, token))]
pub async fn destroy(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Path(id): Path<ServiceId>,
) -> Result<StatusCode> {
    state.backend().delete_service(&token, id).await?;
    tracing::info!(service_id = %id, "Service deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_service_form_price_on_request() {
        let form: ServiceForm =
            serde_json::from_value(json!({"name": "Instalação", "price": "0,00"})).unwrap();
        let input = form.into_input().unwrap();
        assert_eq!(input.price, None);

        let form: ServiceForm =
            serde_json::from_value(json!({"name": "Frete", "price": 25.9, "contact": " "}))
                .unwrap();
        let input = form.into_input().unwrap();
        assert_eq!(input.price, Some(Decimal::new(2590, 2)));
        assert_eq!(input.contact, None);
    }

    #[test]
    fn test_service_form_rejects_negative_price() {
        let form: ServiceForm =
            serde_json::from_value(json!({"name": "Frete", "price": "-5"})).unwrap();
        assert!(matches!(form.into_input(), Err(AppError::BadRequest(_))));
    }
}
