//! Kitbay CLI - cart, tax and order tools.
//!
//! # Usage
//!
//! ```bash
//! # Work with the cart kept in ./kitbay-storage.json
//! kitbay cart add "XPS 13"
//! kitbay cart list
//!
//! # Tax and currency
//! kitbay tax calc 1000 --office Montreal
//! kitbay convert 100 --to EUR
//!
//! # Order history
//! kitbay orders track a1b2c3d4-e5f6-7890-abcd-ef1234567890
//! ```
//!
//! # Environment Variables
//!
//! - `KITBAY_STORAGE_PATH` - Local storage file (default: kitbay-storage.json)
//! - `KITBAY_CATALOG_PATH` - Product catalog JSON
//! - `KITBAY_ORDERS_PATH` - Order records JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kitbay_core::orders::StatusAssignment;
use kitbay_core::{CurrencyCode, ShippingType, preferences};

mod commands;

use commands::CliError;
use commands::storage::FileStorage;

#[derive(Parser)]
#[command(name = "kitbay")]
#[command(author, version, about = "Kitbay hardware storefront tools")]
struct Cli {
    /// Local storage file holding the cart and preferences
    #[arg(long, global = true, env = "KITBAY_STORAGE_PATH", default_value = "kitbay-storage.json")]
    storage: PathBuf,

    /// Product catalog
    #[arg(
        long,
        global = true,
        env = "KITBAY_CATALOG_PATH",
        default_value = "crates/storefront/data/catalog.json"
    )]
    catalog: PathBuf,

    /// Order records
    #[arg(
        long,
        global = true,
        env = "KITBAY_ORDERS_PATH",
        default_value = "crates/storefront/data/orders.json"
    )]
    orders: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Look up and apply tax rates
    Tax {
        #[command(subcommand)]
        action: TaxAction,
    },
    /// Convert a USD amount
    Convert {
        /// Amount in USD
        amount: String,

        /// Target currency (USD, CAD, EUR)
        #[arg(long, default_value = "CAD")]
        to: CurrencyCode,

        /// Catalog CAD price, used instead of the exchange rate
        #[arg(long)]
        cad_price: Option<String>,
    },
    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// List offices and their tax rates
    Offices,
    /// Show or set the display currency
    Currency {
        /// Currency to switch to; omit to cycle
        currency: Option<CurrencyCode>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents
    List {
        /// Display currency (defaults to the saved preference)
        #[arg(long)]
        currency: Option<CurrencyCode>,
    },
    /// Add a catalog product
    Add {
        model: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove { model: String },
    /// Set a product's quantity
    Set { model: String, quantity: u32 },
    /// Remove everything
    Clear,
}

#[derive(Args)]
struct Destination {
    /// Office the order ships to
    #[arg(long, conflicts_with = "residential")]
    office: Option<String>,

    /// Ship to a home address
    #[arg(long)]
    residential: bool,
}

impl Destination {
    fn resolve(&self) -> (ShippingType, &str) {
        match (&self.office, self.residential) {
            (Some(office), false) => (ShippingType::Office, office.as_str()),
            _ => (ShippingType::Residential, ""),
        }
    }
}

#[derive(Subcommand)]
enum TaxAction {
    /// Show the rate for a destination
    Rate {
        #[command(flatten)]
        destination: Destination,
    },
    /// Compute tax on a subtotal
    Calc {
        subtotal: String,
        #[command(flatten)]
        destination: Destination,
        #[arg(long, default_value = "USD")]
        currency: CurrencyCode,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, newest first
    List {
        /// How statuses are shown: a status, by-age, by-value or none
        #[arg(long, default_value = "none")]
        status: StatusAssignment,
        #[arg(long)]
        currency: Option<CurrencyCode>,
    },
    /// Show the tracking timeline for an order
    Track {
        id: String,
        #[arg(long, default_value = "none")]
        status: StatusAssignment,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kitbay_cli=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            #[allow(clippy::print_stdout)]
            {
                println!("{output}");
            }
        }
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    match cli.command {
        Commands::Cart { action } => {
            let storage = FileStorage::open(&cli.storage)?;
            match action {
                CartAction::List { currency } => Ok(commands::cart::list(storage, currency)),
                CartAction::Add { model, quantity } => {
                    let catalog = commands::load_catalog(&cli.catalog)?;
                    commands::cart::add(storage, &catalog, &model, quantity)
                }
                CartAction::Remove { model } => commands::cart::remove(storage, &model),
                CartAction::Set { model, quantity } => {
                    commands::cart::set(storage, &model, quantity)
                }
                CartAction::Clear => commands::cart::clear(storage),
            }
        }
        Commands::Tax { action } => match action {
            TaxAction::Rate { destination } => {
                let (shipping_type, location) = destination.resolve();
                Ok(commands::pricing::rate(shipping_type, location))
            }
            TaxAction::Calc {
                subtotal,
                destination,
                currency,
            } => {
                let subtotal = commands::pricing::parse_amount(&subtotal)?;
                let (shipping_type, location) = destination.resolve();
                Ok(commands::pricing::calc(subtotal, shipping_type, location, currency))
            }
        },
        Commands::Convert {
            amount,
            to,
            cad_price,
        } => {
            let amount = commands::pricing::parse_amount(&amount)?;
            let cad_price = cad_price
                .as_deref()
                .map(commands::pricing::parse_amount)
                .transpose()?;
            Ok(commands::pricing::convert(amount, to, cad_price))
        }
        Commands::Orders { action } => match action {
            OrdersAction::List { status, currency } => {
                let source = commands::load_orders(&cli.orders, status)?;
                let currency = match currency {
                    Some(currency) => currency,
                    None => preferences::load(&FileStorage::open(&cli.storage)?),
                };
                Ok(commands::orders::list(&source, currency))
            }
            OrdersAction::Track { id, status } => {
                let source = commands::load_orders(&cli.orders, status)?;
                commands::orders::track(&source, &id)
            }
        },
        Commands::Offices => Ok(commands::pricing::offices()),
        Commands::Currency { currency } => {
            let mut storage = FileStorage::open(&cli.storage)?;
            let currency = match currency {
                Some(currency) => {
                    preferences::save(&mut storage, currency)?;
                    currency
                }
                None => preferences::toggle(&mut storage)?,
            };
            Ok(format!("Display currency: {currency}"))
        }
    }
}
