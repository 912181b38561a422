//! News module: weather, commodity quotes and articles.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vitrine_core::format::{format_date_br, format_decimal_brl, format_number_br, format_percentage};
use vitrine_core::query::DEFAULT_LIMIT;
use vitrine_core::{NewsPost, NewsPostId, QuoteItem, WeatherItem};

use super::{MAX_PAGE_SIZE, PageView};
use crate::error::Result;
use crate::state::AppState;

/// Characters kept in post card excerpts.
const EXCERPT_CHARS: usize = 160;

/// Posts shown on the news overview.
const OVERVIEW_POSTS: u32 = 6;

/// Weather display data.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherView {
    pub city: String,
    pub temperature: Option<String>,
    pub min_temperature: Option<String>,
    pub max_temperature: Option<String>,
    pub humidity: Option<String>,
    pub condition: Option<String>,
    pub icon: Option<String>,
    pub date: Option<String>,
}

fn celsius(value: f64) -> String {
    format!("{}°C", format_number_br(value))
}

fn display_date(raw: Option<&str>) -> Option<String> {
    raw.map(format_date_br).filter(|d| !d.is_empty())
}

impl From<&WeatherItem> for WeatherView {
    fn from(item: &WeatherItem) -> Self {
        Self {
            city: item.city.clone(),
            temperature: item.temperature.map(celsius),
            min_temperature: item.min_temperature.map(celsius),
            max_temperature: item.max_temperature.map(celsius),
            humidity: item.humidity.map(format_percentage),
            condition: item.condition.clone(),
            icon: item.icon.clone(),
            date: display_date(item.date.as_deref()),
        }
    }
}

/// Direction of a quote's daily variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Commodity quote display data.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteView {
    pub name: String,
    pub price: Option<String>,
    pub unit: Option<String>,
    pub variation: Option<String>,
    pub trend: Trend,
    pub source: Option<String>,
    pub updated_at: Option<String>,
}

impl From<&QuoteItem> for QuoteView {
    fn from(item: &QuoteItem) -> Self {
        let trend = match item.variation {
            Some(v) if v > 0.0 => Trend::Up,
            Some(v) if v < 0.0 => Trend::Down,
            _ => Trend::Stable,
        };
        Self {
            name: item.name.clone(),
            price: item.price.map(format_decimal_brl),
            unit: item.unit.clone(),
            variation: item.variation.map(|v| {
                let sign = if v > 0.0 { "+" } else { "" };
                format!("{sign}{}", format_percentage(v))
            }),
            trend,
            source: item.source.clone(),
            updated_at: display_date(item.updated_at.as_deref()),
        }
    }
}

/// Post card display data.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummaryView {
    pub id: NewsPostId,
    /// Path segment for the detail route.
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub published_at: Option<String>,
}

impl From<&NewsPost> for PostSummaryView {
    fn from(post: &NewsPost) -> Self {
        Self {
            id: post.id,
            slug: post.route_key(),
            title: post.title.clone(),
            excerpt: post.excerpt(EXCERPT_CHARS),
            image_url: post.image_url.clone(),
            category: post.category.clone(),
            published_at: display_date(post.published_at.as_deref()),
        }
    }
}

/// Full post display data.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub summary: PostSummaryView,
    pub content: String,
    pub author: Option<String>,
}

impl From<&NewsPost> for PostView {
    fn from(post: &NewsPost) -> Self {
        Self {
            summary: PostSummaryView::from(post),
            content: post.content.clone().unwrap_or_default(),
            author: post.author.clone(),
        }
    }
}

/// News overview payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewsView {
    pub weather: Vec<WeatherView>,
    pub quotes: Vec<QuoteView>,
    pub posts: Vec<PostSummaryView>,
}

/// Post listing query parameters.
#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Weather, quotes and latest posts.
///
/// Weather and quotes come from third-party feeds behind the backend; when
/// either is down the section is returned empty rather than failing the page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<NewsView>> {
    let weather = state.backend().weather().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to fetch weather: {e}");
        Vec::new()
    });
    let quotes = state.backend().quotes().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to fetch quotes: {e}");
        Vec::new()
    });
    let posts = state.backend().list_posts(1, OVERVIEW_POSTS).await?;

    Ok(Json(NewsView {
        weather: weather.iter().map(WeatherView::from).collect(),
        quotes: quotes.iter().map(QuoteView::from).collect(),
        posts: posts.items.iter().map(PostSummaryView::from).collect(),
    }))
}

/// Post listing.
#[instrument(skip(state))]
pub async fn posts(
    State(state): State<AppState>,
    Query(query): Query<PostsQuery>,
) -> Result<Json<PageView<PostSummaryView>>> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_PAGE_SIZE);
    let posts = state.backend().list_posts(page, limit).await?;
    Ok(Json(PageView::from_page(&posts, |p| PostSummaryView::from(p))))
}

/// Post detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostView>> {
    let post = state.backend().get_post(slug.trim()).await?;
    Ok(Json(PostView::from(&post)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_weather_view() {
        let item: WeatherItem = serde_json::from_value(json!({
            "cidade": "Londrina", "temperatura": 27.5, "temp_min": 18,
            "umidade": 55, "data": "2024-07-01"
        }))
        .unwrap();
        let view = WeatherView::from(&item);
        assert_eq!(view.temperature.as_deref(), Some("27,5°C"));
        assert_eq!(view.min_temperature.as_deref(), Some("18°C"));
        assert_eq!(view.humidity.as_deref(), Some("55%"));
        assert_eq!(view.date.as_deref(), Some("01/07/2024"));
    }

    #[test]
    fn test_quote_view_trend() {
        let up: QuoteItem = serde_json::from_value(json!({
            "produto": "Milho", "valor": "62,3", "variacao": 1.25
        }))
        .unwrap();
        let view = QuoteView::from(&up);
        assert_eq!(view.price.as_deref(), Some("R$ 62,30"));
        assert_eq!(view.variation.as_deref(), Some("+1,25%"));
        assert_eq!(view.trend, Trend::Up);

        let down: QuoteItem =
            serde_json::from_value(json!({"produto": "Soja", "variacao": "-0,5"})).unwrap();
        let view = QuoteView::from(&down);
        assert_eq!(view.variation.as_deref(), Some("-0,5%"));
        assert_eq!(view.trend, Trend::Down);
        assert_eq!(view.price, None);
    }

    #[test]
    fn test_post_view_flattens_summary() {
        let post: NewsPost = serde_json::from_value(json!({
            "id": 3, "titulo": "Chuva no fim de semana", "slug": "chuva",
            "conteudo": "Previsão de chuva.", "autor": "Redação"
        }))
        .unwrap();
        let value = serde_json::to_value(PostView::from(&post)).unwrap();
        assert_eq!(value["slug"], "chuva");
        assert_eq!(value["excerpt"], "Previsão de chuva.");
        assert_eq!(value["author"], "Redação");
    }
}
