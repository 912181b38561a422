//! News post management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use vitrine_core::{NewsPost, NewsPostId};

use super::{PageQuery, PageView, default_true, display_date, non_blank, required};
use crate::backend::NewsPostInput;
use crate::error::Result;
use crate::middleware::AdminToken;
use crate::state::AppState;

/// Characters kept in listing excerpts.
const EXCERPT_CHARS: usize = 120;

/// Post row for the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct AdminPostView {
    pub id: NewsPostId,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub category: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<String>,
}

impl From<&NewsPost> for AdminPostView {
    fn from(post: &NewsPost) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            slug: post.route_key(),
            excerpt: post.excerpt(EXCERPT_CHARS),
            category: post.category.clone(),
            author: post.author.clone(),
            published_at: display_date(post.published_at.as_deref()),
        }
    }
}

/// Post form data.
#[derive(Debug, Default, Deserialize)]
pub struct NewsPostForm {
    #[serde(default)]
    pub title: String,
    /// Derived from the title when blank.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default = "default_true")]
    pub published: bool,
}

impl NewsPostForm {
    /// Validate the form and build the backend payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a missing title or content.
    pub fn into_input(self) -> Result<NewsPostInput> {
        let title = required(&self.title, "Informe o título")?;
        let content = required(&self.content, "Informe o conteúdo")?;

        let slug = non_blank(self.slug.as_deref()).map_or_else(|| slugify(&title), |s| slugify(&s));

        Ok(NewsPostInput {
            slug: (!slug.is_empty()).then_some(slug),
            title,
            summary: non_blank(self.summary.as_deref()),
            content,
            image_url: non_blank(self.image_url.as_deref()),
            category: non_blank(self.category.as_deref()),
            author: non_blank(self.author.as_deref()),
            published: self.published,
        })
    }
}

/// Fold common Portuguese accents to ASCII.
const fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// URL slug: lowercase ASCII words joined by single hyphens.
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    for c in input.chars().flat_map(char::to_lowercase).map(fold_accent) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Post listing, drafts included.
#[instrument(skip(state, token))]
pub async fn index(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageView<AdminPostView>>> {
    let page = state
        .backend()
        .list_posts(&token, query.page.unwrap_or(1))
        .await?;
    Ok(Json(PageView::from_page(&page, |p| AdminPostView::from(p))))
}

/// Create a post.
#[instrument(skip(state, token, form))]
pub async fn create(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Json(form): Json<NewsPostForm>,
) -> Result<(StatusCode, Json<AdminPostView>)> {
    let input = form.into_input()?;
    let post = state.backend().create_post(&token, &input).await?;
    tracing::info!(post_id = %post.id, "News post created");
    Ok((StatusCode::CREATED, Json(AdminPostView::from(&post))))
}

/// Update a post.
#[instrument(skip(state, token, form))]
pub async fn update(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Path(id): Path<NewsPostId>,
    Json(form): Json<NewsPostForm>,
) -> Result<Json<AdminPostView>> {
    let input = form.into_input()?;
    let post = state.backend().update_post(&token, id, &input).await?;
    tracing::info!(post_id = %id, "News post updated");
    Ok(Json(AdminPostView::from(&post)))
}

/// Delete a post.
#[instrument(skip(state, token))]
pub async fn destroy(
    State(state): State<AppState>,
    AdminToken(token): AdminToken,
    Path(id): Path<NewsPostId>,
) -> Result<StatusCode> {
    state.backend().delete_post(&token, id).await?;
    tracing::info!(post_id = %id, "News post deleted");
    Ok(StatusCode::NO_CONTENT)
}
