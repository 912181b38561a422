//! Query strings for the backend list endpoints.
//!
//! # Parameters
//!
//! ```text
//! search       trimmed, omitted when blank
//! categories   comma-joined ids, omitted when empty
//! category     single-id alias, only when exactly one id is given
//! category_id  single-id alias, only when exactly one id is given
//! min_price    omitted when absent
//! max_price    omitted when absent
//! promo        "true" when the promo flag is set, otherwise omitted
//! sort         omitted when absent
//! page         defaults to 1
//! limit        defaults to 12
//! ```
//!
//! The two single-id aliases exist for older backend deployments that only
//! understand `category`/`category_id`.

use serde::{Deserialize, Serialize};

use crate::types::CategoryId;

/// Default page when none is requested.
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size when none is requested.
pub const DEFAULT_LIMIT: u32 = 12;

/// Sort orders accepted by the backend list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
}

impl SortKey {
    /// The backend's wire name for this sort order.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Name => "name",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "newest" => Ok(Self::Newest),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "name" => Ok(Self::Name),
            other => Err(format!("invalid sort key: {other}")),
        }
    }
}

/// Structured filter for product and service listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListFilter {
    pub search: Option<String>,
    #[serde(default)]
    pub categories: Vec<CategoryId>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    #[serde(default)]
    pub promo: bool,
    pub sort: Option<SortKey>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListFilter {
    /// Effective page number (1-based).
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE)
    }

    /// Effective page size.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT)
    }

    /// Cache-friendly canonical form of this filter.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        build_query_string(self)
    }
}

/// Format a price bound without a trailing `.0` for whole numbers.
fn format_bound(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    Some(trimmed.to_string())
}

/// Build the URL-encoded query string (without the leading `?`).
///
/// ```
/// use vitrine_core::{CategoryId, ListFilter, build_query_string};
///
/// let filter = ListFilter {
///     categories: vec![CategoryId::new(7)],
///     ..ListFilter::default()
/// };
/// assert_eq!(
///     build_query_string(&filter),
///     "categories=7&category=7&category_id=7&page=1&limit=12"
/// );
/// ```
#[must_use]
pub fn build_query_string(filter: &ListFilter) -> String {
    let mut pairs: Vec<(&str, String)> = Vec::new();

    if let Some(search) = filter.search.as_deref().map(str::trim)
        && !search.is_empty()
    {
        pairs.push(("search", urlencoding::encode(search).into_owned()));
    }

    match filter.categories.as_slice() {
        [] => {}
        [single] => {
            let id = single.to_string();
            pairs.push(("categories", id.clone()));
            pairs.push(("category", id.clone()));
            pairs.push(("category_id", id));
        }
        many => {
            let joined = many
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("categories", joined));
        }
    }

    if let Some(min) = filter.min_price.and_then(format_bound) {
        pairs.push(("min_price", min));
    }
    if let Some(max) = filter.max_price.and_then(format_bound) {
        pairs.push(("max_price", max));
    }
    if filter.promo {
        pairs.push(("promo", "true".to_string()));
    }
    if let Some(sort) = filter.sort {
        pairs.push(("sort", sort.as_str().to_string()));
    }

    pairs.push(("page", filter.page().to_string()));
    pairs.push(("limit", filter.limit().to_string()));

    pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Convert a comma-separated id list (`"1, 2,x,3"`) into category ids.
///
/// Blank and non-numeric entries are skipped; duplicates keep their first
/// position.
#[must_use]
pub fn parse_id_list(input: &str) -> Vec<CategoryId> {
    let mut ids: Vec<CategoryId> = Vec::new();
    for id in input
        .split(',')
        .filter_map(|part| part.trim().parse::<CategoryId>().ok())
    {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
