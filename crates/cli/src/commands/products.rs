//! Catalog lookup command.
//!
//! Fetches one page of products from the backend and prints a line per
//! product.

use clap::Args;
use url::Url;
use vitrine_core::format::format_decimal_brl;
use vitrine_core::{Page, Product};

use super::CliError;
use super::query::QueryArgs;

/// Arguments for `vitrine-cli products`.
#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Backend base URL
    #[arg(long, env = "BACKEND_API_URL")]
    pub backend_url: String,

    #[command(flatten)]
    pub query: QueryArgs,
}

/// Build the listing URL for `args`.
///
/// # Errors
///
/// Returns an error if the backend URL or a filter value is invalid.
pub fn listing_url(args: &ProductsArgs) -> Result<Url, CliError> {
    let mut base = Url::parse(&args.backend_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    let mut url = base.join("api/products")?;
    let query = super::query::run(&args.query)?;
    url.set_query(Some(&query));
    Ok(url)
}

/// One display line for a product.
#[must_use]
pub fn product_line(product: &Product) -> String {
    let mut line = format!(
        "#{:<6} {:<40} {}",
        product.id.to_string(),
        product.name,
        format_decimal_brl(product.price)
    );
    if product.is_on_promo() {
        line.push_str(&format!(
            " (promo {})",
            format_decimal_brl(product.effective_price())
        ));
    }
    match product.stock() {
        Some(qty) => line.push_str(&format!(" estoque: {qty}")),
        None => line.push_str(" estoque: -"),
    }
    line
}

/// Fetch and print one page of products.
///
/// # Errors
///
/// Returns an error if the request fails or the backend answers with a
/// non-success status.
pub async fn list(args: &ProductsArgs) -> Result<(), CliError> {
    let url = listing_url(args)?;
    tracing::debug!(%url, "Fetching products");

    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Backend(status.as_u16()));
    }
    let body = response.text().await?;
    let page: Page<Product> = serde_json::from_str(&body)?;

    print_page(&page);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_page(page: &Page<Product>) {
    for product in &page.items {
        println!("{}", product_line(product));
    }
    println!(
        "Página {} de {} ({} produtos)",
        page.page,
        page.total_pages(),
        page.total
    );
}
