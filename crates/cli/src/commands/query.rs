//! Query-string command.
//!
//! # Usage
//!
//! ```bash
//! vitrine-cli query --search café --categories 1,2 --min-price "10,00" --promo
//! ```

use clap::Args;
use vitrine_core::format::parse_locale_number;
use vitrine_core::{ListFilter, SortKey, build_query_string, parse_id_list};

use super::CliError;

/// Listing filter options shared by `query` and `products`.
#[derive(Debug, Default, Args)]
pub struct QueryArgs {
    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Comma-separated category ids
    #[arg(long)]
    pub categories: Option<String>,

    /// Minimum price (pt-BR format accepted)
    #[arg(long)]
    pub min_price: Option<String>,

    /// Maximum price (pt-BR format accepted)
    #[arg(long)]
    pub max_price: Option<String>,

    /// Only products on promotion
    #[arg(long)]
    pub promo: bool,

    /// Sort order (`newest`, `price_asc`, `price_desc`, `name`)
    #[arg(long)]
    pub sort: Option<String>,

    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size
    #[arg(long)]
    pub limit: Option<u32>,
}

fn price_bound(raw: Option<&str>) -> Result<Option<f64>, CliError> {
    raw.map(|value| {
        parse_locale_number(value)
            .ok_or_else(|| CliError::InvalidInput(format!("{value:?} is not a price")))
    })
    .transpose()
}

impl QueryArgs {
    /// Build the listing filter.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidInput` for unreadable prices or sort keys.
    pub fn to_filter(&self) -> Result<ListFilter, CliError> {
        Ok(ListFilter {
            search: self.search.clone(),
            categories: self
                .categories
                .as_deref()
                .map(parse_id_list)
                .unwrap_or_default(),
            min_price: price_bound(self.min_price.as_deref())?,
            max_price: price_bound(self.max_price.as_deref())?,
            promo: self.promo,
            sort: self
                .sort
                .as_deref()
                .map(str::parse::<SortKey>)
                .transpose()
                .map_err(CliError::InvalidInput)?,
            page: self.page,
            limit: self.limit,
        })
    }
}

/// Render the backend query string for `args`.
///
/// # Errors
///
/// Returns `CliError::InvalidInput` for unreadable prices or sort keys.
pub fn run(args: &QueryArgs) -> Result<String, CliError> {
    Ok(build_query_string(&args.to_filter()?))
}
