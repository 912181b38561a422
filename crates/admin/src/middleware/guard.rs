//! Admin route guard and token cookie.
//!
//! The guard only checks that the token cookie is present. The backend
//! decides whether the token is valid on every call, and a rejected token
//! surfaces as 401 from the handler.

use axum::{
    Json,
    extract::{FromRequestParts, Request},
    http::{HeaderMap, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

use crate::error::AppError;

/// Name of the cookie holding the backend bearer token.
pub const ADMIN_COOKIE: &str = "vitrine_admin_token";

/// Token cookie lifetime in hours.
const COOKIE_MAX_AGE_HOURS: i64 = 24;

/// Paths reachable without signing in.
const PUBLIC_PATHS: [&str; 4] = ["/login", "/logout", "/health", "/health/ready"];

/// Read the admin token from the request's `Cookie` headers.
///
/// Empty values count as absent.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<SecretString> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(std::result::Result::ok)
        .find(|cookie| cookie.name() == ADMIN_COOKIE && !cookie.value().trim().is_empty())
        .map(|cookie| SecretString::from(cookie.value().to_string()))
}

fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Require the token cookie on every non-public route.
///
/// Without it, `/api/` requests get 401 and page navigations are redirected
/// to `/login?next=<original path>`.
pub async fn require_admin_cookie(request: Request, next: Next) -> Response {
    let path = request.uri().path();

    if is_public(path) || token_from_headers(request.headers()).is_some() {
        return next.run(request).await;
    }

    if path.starts_with("/api/") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Não autenticado" })),
        )
            .into_response();
    }

    let original = request
        .uri()
        .path_and_query()
        .map_or(path, |pq| pq.as_str());
    tracing::debug!(path = original, "Redirecting unauthenticated request to login");
    Redirect::to(&format!("/login?next={}", urlencoding::encode(original))).into_response()
}

/// Only allow same-site relative redirect targets after login.
#[must_use]
pub fn safe_next_path(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.starts_with("/login") =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

/// Cookie carrying a freshly issued token.
#[must_use]
pub fn token_cookie(token: &SecretString, secure: bool) -> Cookie<'static> {
    Cookie::build((ADMIN_COOKIE, token.expose_secret().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(Duration::hours(COOKIE_MAX_AGE_HOURS))
        .build()
}

/// Cookie that clears the token.
#[must_use]
pub fn cleared_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((ADMIN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

/// Extractor for the signed-in user's bearer token.
///
/// ```rust,ignore
/// async fn handler(AdminToken(token): AdminToken) -> impl IntoResponse {
///     // pass `&token` to AdminBackendClient calls
/// }
/// ```
pub struct AdminToken(pub SecretString);

impl<S> FromRequestParts<S> for AdminToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        token_from_headers(&parts.headers)
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("Não autenticado".to_string()))
    }
}
