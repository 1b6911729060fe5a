//! Trivan CLI - Operate the storefront from the command line.
//!
//! # Usage
//!
//! ```bash
//! # List the product catalog as a rendered fragment
//! trivan products
//!
//! # Cart operations (persisted under TRIVAN_DATA_DIR)
//! trivan cart show
//! trivan cart add 1
//! trivan cart remove 1
//! trivan cart incr 1
//! trivan cart decr 1
//! trivan cart clear
//! trivan cart total
//!
//! # Promotional popup record
//! trivan popup status
//! trivan popup dismiss
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use trivan_core::ProductId;
use trivan_storefront::app::App;
use trivan_storefront::config::StoreConfig;

mod commands;

#[derive(Parser)]
#[command(name = "trivan")]
#[command(author, version, about = "Trivan storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the catalog and print the product grid fragment
    Products,
    /// Operate on the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Inspect or set the popup dismissal record
    Popup {
        #[command(subcommand)]
        action: PopupAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart panel and count badge
    Show,
    /// Add a product to the cart
    Add { id: ProductId },
    /// Remove a product from the cart
    Remove { id: ProductId },
    /// Increase the quantity of a cart line
    Incr { id: ProductId },
    /// Decrease the quantity of a cart line
    Decr { id: ProductId },
    /// Empty the cart
    Clear,
    /// Print the cart total
    Total,
}

#[derive(Subcommand)]
enum PopupAction {
    /// Print whether the popup is currently dismissed
    Status,
    /// Dismiss the popup for 30 days
    Dismiss,
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; default to warnings only so
    // rendered fragments stay clean on stdout
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreConfig::from_env()?;
    let app = App::new(config)?;

    match cli.command {
        Commands::Products => commands::products::show(&app).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&app).await?,
            CartAction::Add { id } => commands::cart::add(&app, id).await?,
            CartAction::Remove { id } => commands::cart::remove(&app, id).await?,
            CartAction::Incr { id } => commands::cart::increase(&app, id).await?,
            CartAction::Decr { id } => commands::cart::decrease(&app, id).await?,
            CartAction::Clear => commands::cart::clear(&app).await?,
            CartAction::Total => commands::cart::total(&app).await?,
        },
        Commands::Popup { action } => match action {
            PopupAction::Status => commands::popup::status(&app),
            PopupAction::Dismiss => commands::popup::dismiss(&app),
        },
    }
    Ok(())
}
