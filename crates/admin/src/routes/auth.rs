//! Login and logout.
//!
//! Credentials go straight to the backend; the returned token is kept in an
//! `HttpOnly` cookie and sent back as a bearer token on every API call.

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vitrine_core::Email;
use vitrine_core::format::normalize_email;

use crate::backend::{AdminUser, BackendError};
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::guard::{cleared_cookie, safe_next_path, token_cookie};
use crate::state::AppState;

/// `?next=` query parameter.
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Login page payload.
#[derive(Debug, Serialize)]
pub struct LoginPageView {
    /// Where the client should go after signing in.
    pub next: String,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginView {
    pub redirect: String,
    pub user: Option<AdminUser>,
}

/// Login page.
pub async fn login_page(Query(query): Query<NextQuery>) -> Json<LoginPageView> {
    Json(LoginPageView {
        next: safe_next_path(query.next.as_deref()),
    })
}

/// Handle login.
#[instrument(skip(state, form), fields(email = tracing::field::Empty))]
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<impl IntoResponse> {
    let email = Email::parse(&normalize_email(&form.email))
        .map_err(|_| AppError::BadRequest("E-mail inválido".to_string()))?;
    tracing::Span::current().record("email", email.as_str());

    if form.password.is_empty() {
        return Err(AppError::BadRequest("Informe a senha".to_string()));
    }

    let session = match state.backend().login(email.as_str(), &form.password).await {
        Ok(session) => session,
        Err(BackendError::Unauthorized) => {
            tracing::warn!("Login rejected by backend");
            return Err(AppError::Unauthorized(
                "E-mail ou senha inválidos".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    set_sentry_user(email.as_str());
    tracing::info!("Admin signed in");

    let cookie = token_cookie(&session.token, state.config().is_secure());
    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Json(LoginView {
            redirect: safe_next_path(form.next.as_deref()),
            user: session.user,
        }),
    ))
}

/// Handle logout.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    clear_sentry_user();
    let cookie = cleared_cookie(state.config().is_secure());
    (
        [(header::SET_COOKIE, cookie.to_string())],
        Redirect::to("/login"),
    )
}
