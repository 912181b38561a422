//! Vitrine CLI - Formatters, query strings and catalog lookups.
//!
//! # Usage
//!
//! ```bash
//! # Mask a CPF
//! vitrine-cli format cpf 52998224725
//!
//! # Parse a pt-BR price
//! vitrine-cli format currency "R$ 1.234,56"
//!
//! # Show the backend query string for a filter
//! vitrine-cli query --categories 3 --promo --sort price_asc
//!
//! # List products from the backend
//! vitrine-cli products --backend-url http://localhost:8000 --search mel
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::format::FormatKind;
use commands::products::ProductsArgs;
use commands::query::QueryArgs;

#[derive(Parser)]
#[command(name = "vitrine-cli")]
#[command(author, version, about = "Vitrine CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mask, parse or format a value
    Format {
        /// What the value is
        #[arg(value_enum)]
        kind: FormatKind,

        /// Raw value as typed by a user
        value: String,
    },
    /// Print the backend query string for a listing filter
    Query(QueryArgs),
    /// List products from the backend
    Products(ProductsArgs),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Format { kind, value } => {
            println!("{}", commands::format::run(kind, &value)?);
        }
        Commands::Query(args) => {
            println!("{}", commands::query::run(&args)?);
        }
        Commands::Products(args) => commands::products::list(&args).await?,
    }
    Ok(())
}
