//! Backend REST API client for public storefront endpoints.
//!
//! # Architecture
//!
//! - Thin `reqwest` wrapper, the backend is the source of truth
//! - Catalog and news reads are cached in `moka` (TTL from configuration)
//! - Coupon validation and order creation always reach the backend
//!
//! List endpoints answer with either a bare JSON array or a paging envelope;
//! single-item endpoints with either the object or `{"data": {...}}`. Both
//! shapes are accepted.

mod cache;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use vitrine_core::query::DEFAULT_LIMIT;
use vitrine_core::{
    Category, Coupon, ListFilter, NewOrder, NewsPost, Order, Page, Product, ProductId, QuoteItem,
    Service, ServiceId, WeatherItem,
};

use crate::config::BackendConfig;
use cache::CacheValue;

/// Maximum number of cached responses.
const CACHE_CAPACITY: u64 = 1000;

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

impl BackendError {
    /// Whether the backend rejected the request content (400 or 422).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Status { status: 400 | 422, .. })
    }
}

/// Client for the backend's public endpoints.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    cache: Cache<String, CacheValue>,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                api_key: config.api_key.clone(),
                cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let request = self.inner.client.get(self.url(path));
        self.execute(path, request).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.inner.client.post(self.url(path)).json(body);
        self.execute(path, request).await
    }

    /// Send a request and decode the JSON response.
    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let request = match &self.inner.api_key {
            Some(key) => request.header("x-api-key", key.expose_secret()),
            None => request,
        };

        let response = request.header("Accept", "application/json").send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(BackendError::RateLimited(retry_after(&response)));
        }

        // Body as text first for better error diagnostics
        let response_text = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path,
                body = %response_text.chars().take(LOG_BODY_CHARS).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: error_message(&response_text),
            });
        }

        decode(&response_text).inspect_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body = %response_text.chars().take(LOG_BODY_CHARS).collect::<String>(),
                "Failed to parse backend response"
            );
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List products matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filter))]
    pub async fn list_products(&self, filter: &ListFilter) -> Result<Page<Product>, BackendError> {
        let query = filter.to_query_string();
        let cache_key = format!("products:{query}");

        if let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let page: Page<Product> = self.get(&format!("/api/products?{query}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(page.clone()))
            .await;

        Ok(page)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, BackendError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get(&format!("/api/products/{id}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// List public categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, BackendError> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let page: Page<Category> = self.get("/api/public/categories").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(page.items.clone()))
            .await;

        Ok(page.items)
    }

    /// List services matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filter))]
    pub async fn list_services(&self, filter: &ListFilter) -> Result<Page<Service>, BackendError> {
        let query = filter.to_query_string();
        let cache_key = format!("services:{query}");

        if let Some(CacheValue::Services(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for services");
            return Ok(page);
        }

        let page: Page<Service> = self.get(&format!("/api/servicos?{query}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Services(page.clone()))
            .await;

        Ok(page)
    }

    /// Get a service by id.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the service does not exist.
    #[instrument(skip(self), fields(service_id = %id))]
    pub async fn get_service(&self, id: ServiceId) -> Result<Service, BackendError> {
        let cache_key = format!("service:{id}");

        if let Some(CacheValue::Service(service)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for service");
            return Ok(*service);
        }

        let service: Service = self.get(&format!("/api/servicos/{id}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Service(Box::new(service.clone())))
            .await;

        Ok(service)
    }

    // =========================================================================
    // News
    // =========================================================================

    /// Current weather for the configured cities.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn weather(&self) -> Result<Vec<WeatherItem>, BackendError> {
        let cache_key = "news:weather".to_string();

        if let Some(CacheValue::Weather(items)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for weather");
            return Ok(items);
        }

        let page: Page<WeatherItem> = self.get("/api/news/clima").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Weather(page.items.clone()))
            .await;

        Ok(page.items)
    }

    /// Latest commodity quotes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn quotes(&self) -> Result<Vec<QuoteItem>, BackendError> {
        let cache_key = "news:quotes".to_string();

        if let Some(CacheValue::Quotes(items)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for quotes");
            return Ok(items);
        }

        let page: Page<QuoteItem> = self.get("/api/news/cotacoes").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Quotes(page.items.clone()))
            .await;

        Ok(page.items)
    }

    /// List published posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_posts(&self, page: u32, limit: u32) -> Result<Page<NewsPost>, BackendError> {
        let page = page.max(1);
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        let cache_key = format!("posts:{page}:{limit}");

        if let Some(CacheValue::Posts(posts)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for posts");
            return Ok(posts);
        }

        let posts: Page<NewsPost> = self
            .get(&format!("/api/news/posts?page={page}&limit={limit}"))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Posts(posts.clone()))
            .await;

        Ok(posts)
    }

    /// Get a post by slug (or id).
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the post does not exist.
    #[instrument(skip(self))]
    pub async fn get_post(&self, slug: &str) -> Result<NewsPost, BackendError> {
        let cache_key = format!("post:{slug}");

        if let Some(CacheValue::Post(post)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for post");
            return Ok(*post);
        }

        let post: NewsPost = self
            .get(&format!("/api/news/posts/{}", urlencoding::encode(slug)))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Post(Box::new(post.clone())))
            .await;

        Ok(post)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Look up a coupon by code.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` for unknown codes.
    #[instrument(skip(self))]
    pub async fn validate_coupon(&self, code: &str) -> Result<Coupon, BackendError> {
        let code = Coupon::normalize_code(code);
        self.get(&format!(
            "/api/public/coupons/{}",
            urlencoding::encode(&code)
        ))
        .await
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order or the request fails.
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, BackendError> {
        self.post("/api/public/orders", order).await
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

fn retry_after(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(1)
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
