//! Backend REST API client for the admin endpoints.
//!
//! Every call carries the signed-in user's bearer token; the backend is the
//! only authority on whether that token is still valid. Nothing is cached.

mod payload;

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;
use vitrine_core::{
    Coupon, CouponId, ListFilter, NewsPost, NewsPostId, Order, OrderId, OrderStatus, Page,
    Product, ProductId, Service, ServiceId,
};

pub use payload::{AdminUser, CouponInput, NewsPostInput, ProductInput, ServiceInput};
use payload::{LoginRequest, LoginResponse, StatusUpdate};

/// Number of body characters kept in error logs.
const LOG_BODY_CHARS: usize = 500;

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The token is missing, expired or lacks permission (401/403).
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success status.
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// A successful login.
pub struct AdminSession {
    pub token: SecretString,
    pub user: Option<AdminUser>,
}

impl std::fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSession")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Client for the backend's admin endpoints.
#[derive(Clone)]
pub struct AdminBackendClient {
    inner: Arc<AdminBackendClientInner>,
}

struct AdminBackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AdminBackendClient {
    /// Create a new admin backend client.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        Self {
            inner: Arc::new(AdminBackendClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
            }),
        }
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&SecretString>,
    ) -> reqwest::RequestBuilder {
        let request = self
            .inner
            .client
            .request(method, format!("{}{path}", self.inner.base_url))
            .header("Accept", "application/json");
        match token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, path: &str, request: reqwest::RequestBuilder) -> Result<String, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BackendError::Unauthorized),
            StatusCode::NOT_FOUND => Err(BackendError::NotFound(path.to_string())),
            s if s.is_success() => Ok(body),
            s => {
                tracing::error!(
                    status = %s,
                    path,
                    body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
                    "Backend returned non-success status"
                );
                Err(BackendError::Status {
                    status: s.as_u16(),
                    message: error_message(&body),
                })
            }
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let body = self.send(path, request).await?;
        decode(&body).inspect_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
                "Failed to parse backend response"
            );
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        token: &SecretString,
        path: &str,
    ) -> Result<T, BackendError> {
        let request = self.request(reqwest::Method::GET, path, Some(token));
        self.call(path, request).await
    }

    async fn write<B, T>(
        &self,
        method: reqwest::Method,
        token: &SecretString,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, path, Some(token)).json(body);
        self.call(path, request).await
    }

    async fn delete(&self, token: &SecretString, path: &str) -> Result<(), BackendError> {
        let request = self.request(reqwest::Method::DELETE, path, Some(token));
        self.send(path, request).await.map(|_| ())
    }

    /// Whether the backend answers its health endpoint.
    pub async fn ping(&self) -> bool {
        let request = self.request(reqwest::Method::GET, "/health", None);
        self.send("/health", request).await.is_ok()
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unauthorized` for bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminSession, BackendError> {
        let path = "/api/admin/login";
        let request = self
            .request(reqwest::Method::POST, path, None)
            .json(&LoginRequest { email, password });
        let response: LoginResponse = self.call(path, request).await?;

        Ok(AdminSession {
            token: SecretString::from(response.token),
            user: response.user,
        })
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List products, including inactive ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, filter))]
    pub async fn list_products(
        &self,
        token: &SecretString,
        filter: &ListFilter,
    ) -> Result<Page<Product>, BackendError> {
        let path = format!("/api/admin/products?{}", filter.to_query_string());
        self.get(token, &path).await
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the product does not exist.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn get_product(
        &self,
        token: &SecretString,
        id: ProductId,
    ) -> Result<Product, BackendError> {
        self.get(token, &format!("/api/admin/products/{id}")).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the product.
    #[instrument(skip(self, token, input), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        token: &SecretString,
        input: &ProductInput,
    ) -> Result<Product, BackendError> {
        self.write(reqwest::Method::POST, token, "/api/admin/products", input)
            .await
    }

    /// Replace a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the product.
    #[instrument(skip(self, token, input), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &SecretString,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, BackendError> {
        let path = format!("/api/admin/products/{id}");
        self.write(reqwest::Method::PUT, token, &path, input).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the product does not exist.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(&self, token: &SecretString, id: ProductId) -> Result<(), BackendError> {
        self.delete(token, &format!("/api/admin/products/{id}")).await
    }

    // =========================================================================
    // Services
    // =========================================================================

    /// List services, including inactive ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, filter))]
    pub async fn list_services(
        &self,
        token: &SecretString,
        filter: &ListFilter,
    ) -> Result<Page<Service>, BackendError> {
        let path = format!("/api/admin/servicos?{}", filter.to_query_string());
        self.get(token, &path).await
    }

    /// Create a service.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the service.
    #[instrument(skip(self, token, input), fields(name = %input.name))]
    pub async fn create_service(
        &self,
        token: &SecretString,
        input: &ServiceInput,
    ) -> Result<Service, BackendError> {
        self.write(reqwest::Method::POST, token, "/api/admin/servicos", input)
            .await
    }

    /// Replace a service.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the service.
    #[instrument(skip(self, token, input), fields(service_id = %id))]
    pub async fn update_service(
        &self,
        token: &SecretString,
        id: ServiceId,
        input: &ServiceInput,
    ) -> Result<Service, BackendError> {
        let path = format!("/api/admin/servicos/{id}");
        self.write(reqwest::Method::PUT, token, &path, input).await
    }

    /// Delete a service.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the service does not exist.
    #[instrument(skip(self, token), fields(service_id = %id))]
    pub async fn delete_service(&self, token: &SecretString, id: ServiceId) -> Result<(), BackendError> {
        self.delete(token, &format!("/api/admin/servicos/{id}")).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List orders, newest first, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn list_orders(
        &self,
        token: &SecretString,
        status: Option<OrderStatus>,
        page: u32,
    ) -> Result<Page<Order>, BackendError> {
        let mut path = format!("/api/admin/orders?page={}", page.max(1));
        if let Some(status) = status {
            path.push_str("&status=");
            path.push_str(status.as_str());
        }
        self.get(token, &path).await
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the order does not exist.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn get_order(&self, token: &SecretString, id: OrderId) -> Result<Order, BackendError> {
        self.get(token, &format!("/api/admin/orders/{id}")).await
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the change.
    #[instrument(skip(self, token), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        token: &SecretString,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, BackendError> {
        let path = format!("/api/admin/orders/{id}/status");
        self.write(reqwest::Method::PATCH, token, &path, &StatusUpdate { status })
            .await
    }

    // =========================================================================
    // Coupons
    // =========================================================================

    /// List all coupons.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn list_coupons(&self, token: &SecretString) -> Result<Vec<Coupon>, BackendError> {
        let page: Page<Coupon> = self.get(token, "/api/admin/coupons").await?;
        Ok(page.items)
    }

    /// Create a coupon.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the coupon (e.g. duplicate code).
    #[instrument(skip(self, token, input), fields(code = %input.code))]
    pub async fn create_coupon(
        &self,
        token: &SecretString,
        input: &CouponInput,
    ) -> Result<Coupon, BackendError> {
        self.write(reqwest::Method::POST, token, "/api/admin/coupons", input)
            .await
    }

    /// Delete a coupon.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the coupon does not exist.
    #[instrument(skip(self, token), fields(coupon_id = %id))]
    pub async fn delete_coupon(&self, token: &SecretString, id: CouponId) -> Result<(), BackendError> {
        self.delete(token, &format!("/api/admin/coupons/{id}")).await
    }

    // =========================================================================
    // News
    // =========================================================================

    /// List posts, drafts included.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn list_posts(
        &self,
        token: &SecretString,
        page: u32,
    ) -> Result<Page<NewsPost>, BackendError> {
        let path = format!("/api/admin/news/posts?page={}", page.max(1));
        self.get(token, &path).await
    }

    /// Create a post.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the post.
    #[instrument(skip(self, token, input), fields(title = %input.title))]
    pub async fn create_post(
        &self,
        token: &SecretString,
        input: &NewsPostInput,
    ) -> Result<NewsPost, BackendError> {
        self.write(reqwest::Method::POST, token, "/api/admin/news/posts", input)
            .await
    }

    /// Replace a post.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the post.
    #[instrument(skip(self, token, input), fields(post_id = %id))]
    pub async fn update_post(
        &self,
        token: &SecretString,
        id: NewsPostId,
        input: &NewsPostInput,
    ) -> Result<NewsPost, BackendError> {
        let path = format!("/api/admin/news/posts/{id}");
        self.write(reqwest::Method::PUT, token, &path, input).await
    }

    /// Delete a post.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the post does not exist.
    #[instrument(skip(self, token), fields(post_id = %id))]
    pub async fn delete_post(&self, token: &SecretString, id: NewsPostId) -> Result<(), BackendError> {
        self.delete(token, &format!("/api/admin/news/posts/{id}")).await
    }
}

/// Accept both `T` and `{"data": T}`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Bare(T),
    Wrapped { data: T },
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, BackendError> {
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    Ok(match envelope {
        Envelope::Bare(value) | Envelope::Wrapped { data: value } => value,
    })
}

/// Extract a human-readable message from an error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error", "erro", "detail"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(String::from))
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}
