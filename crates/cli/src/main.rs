//! Hearthside CLI - Catalog browsing tools.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, cheapest first
//! hs-cli products --sort priceLow
//!
//! # Search kitchen products between $25 and $50
//! hs-cli products --search mug --category kitchen --price 25to50
//!
//! # Show one product
//! hs-cli product 65f1c2a9e4b0
//!
//! # List valid price bracket and sort ids
//! hs-cli filters
//! ```
//!
//! # Commands
//!
//! - `products` - Fetch the catalog and print the filtered listing
//! - `product` - Fetch a single product
//! - `filters` - Print price bracket and sort options

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hs-cli")]
#[command(author, version, about = "Hearthside CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the catalog and print the filtered, sorted listing
    Products {
        /// Case-insensitive text to match in title, description, brand or tags
        #[arg(short, long)]
        search: Option<String>,

        /// Category id (`all` for every category)
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Price bracket (`all`, `under25`, `25to50`, `50to100`, `over100`)
        #[arg(short, long, default_value = "all")]
        price: String,

        /// Sort key (`featured`, `priceLow`, `priceHigh`, `nameAZ`, `nameZA`, `topRated`)
        #[arg(long, default_value = "featured")]
        sort: String,
    },
    /// Fetch a single product by id
    Product {
        /// Product id
        id: String,
    },
    /// List price bracket and sort options
    Filters,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products {
            search,
            category,
            price,
            sort,
        } => {
            let query = commands::catalog::ListingQuery {
                search,
                category,
                price,
                sort,
            };
            commands::catalog::list(&query).await?;
        }
        Commands::Product { id } => commands::catalog::show(&id).await?,
        Commands::Filters => commands::catalog::filters(),
    }
    Ok(())
}
