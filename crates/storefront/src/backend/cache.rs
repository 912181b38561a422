//! Cache types for backend API responses.

use vitrine_core::{Category, NewsPost, Page, Product, QuoteItem, Service, WeatherItem};

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Page<Product>),
    Categories(Vec<Category>),
    Service(Box<Service>),
    Services(Page<Service>),
    Weather(Vec<WeatherItem>),
    Quotes(Vec<QuoteItem>),
    Post(Box<NewsPost>),
    Posts(Page<NewsPost>),
}
