//! Furia CLI - cart and schedule tools.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to the cart file
//! furia-cli cart add --key scarf --name "Fan Scarf" --price 15.00
//!
//! # Set a quantity (invalid input follows --invalid-quantity)
//! furia-cli cart set scarf 3
//!
//! # Show the cart, print the order email link
//! furia-cli cart show
//! furia-cli cart checkout --to shop@furia.example
//!
//! # Show upcoming games
//! furia-cli schedule --source https://furia.example/schedule.json
//! ```
//!
//! # Commands
//!
//! - `cart` - Operate on a JSON cart file (`--cart-file`, default `furia-cart.json`)
//! - `schedule` - Fetch the games feed and list upcoming games

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use furia_core::cart::InvalidQuantityPolicy;
use furia_core::schedule::{DEFAULT_HOME_VENUE, UPCOMING_LIMIT};
use furia_storefront::config::DEFAULT_SCHEDULE_SOURCE;

mod commands;
mod error;

use commands::cart::FileSlot;
use error::CliError;

#[derive(Parser)]
#[command(name = "furia-cli")]
#[command(author, version, about = "Colonia Furia CLI tools")]
struct Cli {
    /// Cart file
    #[arg(long, global = true, default_value = "furia-cart.json")]
    cart_file: PathBuf,

    /// What to do with a quantity below 1 or not a number (`remove`, `reject`)
    #[arg(long, global = true, default_value = "remove")]
    invalid_quantity: InvalidQuantityPolicy,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Operate on the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// List upcoming games
    Schedule {
        /// Feed URL or file path
        #[arg(short, long, default_value = DEFAULT_SCHEDULE_SOURCE)]
        source: String,

        /// Maximum number of games
        #[arg(short, long, default_value_t = UPCOMING_LIMIT)]
        limit: usize,

        /// Venue shown for home games
        #[arg(long, default_value = DEFAULT_HOME_VENUE)]
        home_venue: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show,
    /// Add a product (an existing key only has its quantity increased)
    Add {
        /// Product key
        #[arg(short, long)]
        key: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Unit price, e.g. 15.00
        #[arg(short, long)]
        price: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a product
    Set {
        /// Product key
        key: String,

        /// New quantity, as typed
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// Remove a product
    Remove {
        /// Product key
        key: String,
    },
    /// Empty the cart
    Clear,
    /// Print the order request email link
    Checkout {
        /// Recipient of the order request
        #[arg(long)]
        to: String,

        /// Email subject
        #[arg(long)]
        subject: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing; RUST_LOG overrides the default
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "furia_cli=info,furia_core=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let slot = FileSlot::new(cli.cart_file);
    let policy = cli.invalid_quantity;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(slot),
            CartAction::Add {
                key,
                name,
                description,
                price,
                quantity,
            } => commands::cart::add(slot, &key, &name, &description, &price, quantity)?,
            CartAction::Set { key, quantity } => {
                commands::cart::set(slot, policy, &key, &quantity);
            }
            CartAction::Remove { key } => commands::cart::remove(slot, &key),
            CartAction::Clear => commands::cart::clear(slot),
            CartAction::Checkout { to, subject } => {
                commands::cart::checkout(&slot, &to, subject.as_deref())?;
            }
        },
        Commands::Schedule {
            source,
            limit,
            home_venue,
        } => commands::schedule::upcoming(&source, limit, &home_venue).await?,
    }
    Ok(())
}
