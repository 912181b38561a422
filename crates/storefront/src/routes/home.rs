//! Home page route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;
use vitrine_core::{ListFilter, SortKey};

use super::news::PostSummaryView;
use super::products::ProductView;
use crate::error::Result;
use crate::state::AppState;

/// Products shown per home page section.
const SECTION_SIZE: u32 = 8;

/// Posts shown in the news highlights.
const HIGHLIGHT_POSTS: u32 = 3;

/// Home page payload.
#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub newest: Vec<ProductView>,
    pub promotions: Vec<ProductView>,
    pub news: Vec<PostSummaryView>,
}

/// Home page: newest products, current promotions and news highlights.
///
/// Only the newest-products section is required; promotions and news fall
/// back to empty lists when the backend fails.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<Json<HomeView>> {
    let newest = state
        .backend()
        .list_products(&ListFilter {
            sort: Some(SortKey::Newest),
            limit: Some(SECTION_SIZE),
            ..ListFilter::default()
        })
        .await?;

    let promotions = state
        .backend()
        .list_products(&ListFilter {
            promo: true,
            limit: Some(SECTION_SIZE),
            ..ListFilter::default()
        })
        .await
        .map(|page| page.items)
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to fetch promotions: {e}");
            Vec::new()
        });

    let news = state
        .backend()
        .list_posts(1, HIGHLIGHT_POSTS)
        .await
        .map(|page| page.items)
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to fetch news highlights: {e}");
            Vec::new()
        });

    Ok(Json(HomeView {
        newest: newest.items.iter().map(ProductView::from).collect(),
        promotions: promotions
            .iter()
            .filter(|p| p.is_on_promo())
            .map(ProductView::from)
            .collect(),
        news: news.iter().map(PostSummaryView::from).collect(),
    }))
}
