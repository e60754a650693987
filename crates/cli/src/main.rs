//! CloudMart CLI - drive the cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (repeat to increment its quantity)
//! cloudmart cart add --id 1 --name "Green Tea" --image /img/tea.png --price 10
//!
//! # Show lines, item count and total
//! cloudmart cart list
//!
//! # Change a quantity, remove a line, empty the cart
//! cloudmart cart set 1 3
//! cloudmart cart remove 1
//! cloudmart cart clear
//!
//! # Place an order for everything in the cart
//! cloudmart order place -e shopper@example.com
//! ```
//!
//! Configuration comes from the environment (see [`config`]).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use cloudmart_cart::{CartStore, FileStore};
use cloudmart_core::{Price, ProductId};
use tracing::info;

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "cloudmart")]
#[command(author, version, about = "CloudMart cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// List cart lines with count and total
    List,
    /// Add one unit of a product
    Add {
        /// Product ID
        #[arg(long)]
        id: ProductId,

        /// Product name
        #[arg(short, long)]
        name: String,

        /// Product image URL
        #[arg(short, long, default_value = "")]
        image: String,

        /// Unit price in currency units
        #[arg(short, long)]
        price: Price,

        /// Product description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Remove a product's line
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Set a product's quantity (values below 1 are ignored)
    Set {
        /// Product ID
        id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Show the total item count
    Count,
    /// Show the cart total
    Total,
}

#[derive(Subcommand)]
enum OrderAction {
    /// Submit the cart as an order, clearing it on success
    Place {
        /// Customer email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cloudmart_cli=info,cloudmart_cart=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::from_env()?;
    let store = CartStore::with_key(FileStore::new(&config.data_dir), config.cart_key.as_str());
    let _badge = commands::cart::badge(&store);

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(&store),
            CartAction::Add {
                id,
                name,
                image,
                price,
                description,
            } => commands::cart::add(&store, id, name, image, price, description)?,
            CartAction::Remove { id } => commands::cart::remove(&store, id)?,
            CartAction::Set { id, quantity } => {
                commands::cart::set_quantity(&store, id, quantity)?;
            }
            CartAction::Clear => commands::cart::clear(&store)?,
            CartAction::Count => info!("{}", store.item_count()),
            CartAction::Total => info!("{}", store.total().display()),
        },
        Commands::Order { action } => match action {
            OrderAction::Place { email } => {
                let api_url = config.require_api_url()?;
                commands::order::place(&store, api_url, &email).await?;
            }
        },
    }
    Ok(())
}
