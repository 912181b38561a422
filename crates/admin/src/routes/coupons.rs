//! Coupon management route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vitrine_core::format::date::parse_date;
use vitrine_core::format::{format_decimal_brl, format_number_br, parse_percentage};
use vitrine_core::{Coupon, CouponId, CouponKind};

use super::{default_true, display_date, money, optional_money, raw_text, required};
use crate::backend::CouponInput;
use crate::error::{AppError, Result};
use crate::middleware::AdminToken;
use crate::state::AppState;

/// Coupon row for the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct CouponView {
    pub id: Option<CouponId>,
    pub code: String,
    pub kind: CouponKind,
    /// `"10%"` or `"R$ 15,00"` depending on the kind.
    pub value: String,
    pub minimum_order: Option<String>,
    pub active: bool,
    pub expires_at: Option<String>,
}

impl From<&Coupon> for CouponView {
    fn from(coupon: &Coupon) -> Self {
        let value = match coupon.kind {
            CouponKind::Percent => {
                format!("{}%", format_number_br(coupon.value.to_f64().unwrap_or_default()))
            }
            CouponKind::Fixed => format_decimal_brl(coupon.value),
        };
        Self {
            id: coupon.id,
            code: coupon.code.clone(),
            kind: coupon.kind,
            value,
            minimum_order: coupon.minimum_order.map(format_decimal_brl),
            active: coupon.active,
            expires_at: display_date(coupon.expires_at.as_deref()),
        }
    }
}

/// Coupon form data.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    #[serde(default)]
    pub code: String,
    pub kind: CouponKind,
    /// Percentage (`"10%"`) or amount (`"15,00"`).
    #[serde(default, deserialize_with = "raw_text")]
    pub value: String,
    #[serde(default, deserialize_with = "raw_text")]
    pub minimum_order: String,
    #[serde(default = "default_true")]
    pub active: bool,
    /// `DD/MM/YYYY` or ISO date; blank for no expiry.
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl CouponForm {
    /// Validate the form and build the backend payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` naming the first invalid field.
    pub fn into_input(self, today: NaiveDate) -> Result<CouponInput> {
        let code = Coupon::normalize_code(&required(&self.code, "Informe o código do cupom")?);
        if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(AppError::BadRequest(
                "O código deve ter apenas letras, números, - e _".to_string(),
            ));
        }

        let value = match self.kind {
            CouponKind::Percent => parse_percentage(&self.value)
                .filter(|p| *p > 0.0 && *p <= 100.0)
                .and_then(Decimal::from_f64_retain)
                .map(|p| p.round_dp(2)),
            CouponKind::Fixed => Some(money(&self.value)).filter(|v| *v > Decimal::ZERO),
        }
        .ok_or_else(|| AppError::BadRequest("Valor do cupom inválido".to_string()))?;

        let minimum_order = optional_money(&self.minimum_order).filter(|m| !m.is_zero());

        let expires_at = match self.expires_at.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let date = parse_date(raw)
                    .ok_or_else(|| AppError::BadRequest("Data de validade inválida".to_string()))?;
                if date < today {
                    return Err(AppError::BadRequest(
                        "Data de validade já passou".to_string(),
                    ));
                }
                Some(date.format("%Y-%m-%d").to_string())
            }
        };

        Ok(CouponInput {
            code,
            kind: self.kind,
            value,
            minimum_order,
            active: self.active,
            expires_at,
        })
    }
}

/// Coupon listing.
#[instrument(skip(state, token))]
pub async fn index(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
) -> Result<Json<Vec<CouponView>>> {
    let coupons = state.backend().list_coupons(&token).await?;
    Ok(Json(coupons.iter().map(CouponView::from).collect()))
}

/// Create a coupon.
#[instrument(skip(state, token, form))]
pub async fn create(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Json(form): Json<CouponForm>,
) -> Result<(StatusCode, Json<CouponView>)> {
    let input = form.into_input(chrono::Utc::now().date_naive())?;
    let coupon = state.backend().create_coupon(&token, &input).await?;
    tracing::info!(code = %coupon.code, "Coupon created");
    Ok((StatusCode::CREATED, Json(CouponView::from(&coupon))))
}

/// Delete a coupon.
#[instrument(skip(state, token))]
pub async fn destroy(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Path(id): Path<CouponId>,
) -> Result<StatusCode> {
    state.backend().delete_coupon(&token, id).await?;
    tracing::info!(coupon_id = %id, "Coupon deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    fn form(value: serde_json::Value) -> CouponForm {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_percent_coupon() {
        let input = form(json!({
            "code": " inverno10 ", "kind": "percentual", "value": "12,5%",
            "minimum_order": "100,00", "expires_at": "31/12/2024"
        }))
        .into_input(today())
        .unwrap();
        assert_eq!(input.code, "INVERNO10");
        assert_eq!(input.kind, CouponKind::Percent);
        assert_eq!(input.value, Decimal::new(125, 1));
        assert_eq!(input.minimum_order, Some(Decimal::new(100, 0)));
        assert_eq!(input.expires_at.as_deref(), Some("2024-12-31"));
    }

    #[test]
    fn test_fixed_coupon() {
        let input = form(json!({"code": "FRETE", "kind": "fixed", "value": 15}))
            .into_input(today())
            .unwrap();
        assert_eq!(input.value, Decimal::new(15, 0));
        assert_eq!(input.minimum_order, None);
        assert_eq!(input.expires_at, None);
        assert!(input.active);
    }

    #[test]
    fn test_invalid_coupons() {
        let cases = [
            json!({"code": "", "kind": "fixed", "value": "10"}),
            json!({"code": "DEZ OFF", "kind": "fixed", "value": "10"}),
            json!({"code": "DEZ", "kind": "percent", "value": "150%"}),
            json!({"code": "DEZ", "kind": "fixed", "value": "abc"}),
            json!({"code": "DEZ", "kind": "fixed", "value": "10", "expires_at": "amanhã"}),
            json!({"code": "DEZ", "kind": "fixed", "value": "10", "expires_at": "2024-06-30"}),
        ];
        for case in cases {
            assert!(
                matches!(form(case.clone()).into_input(today()), Err(AppError::BadRequest(_))),
                "{case} should be rejected"
            );
        }
    }

    #[test]
    fn test_coupon_view() {
        let coupon: Coupon = serde_json::from_value(json!({
            "id": 1, "codigo": "DEZ", "tipo": "percentual", "valor": "12.5",
            "validade": "2024-12-31"
        }))
        .unwrap();
        let view = CouponView::from(&coupon);
        assert_eq!(view.value, "12,5%");
        assert_eq!(view.expires_at.as_deref(), Some("31/12/2024"));

        let coupon: Coupon = serde_json::from_value(json!({
            "codigo": "FRETE", "tipo": "fixo", "valor": "15"
        }))
        .unwrap();
        assert_eq!(CouponView::from(&coupon).value, "R$ 15,00");
    }
}
