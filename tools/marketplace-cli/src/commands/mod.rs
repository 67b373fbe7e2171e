//! CLI command implementations.

pub mod cart;
pub mod config;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// List items in the cart.
    Show,
    /// Add a product, or bump its quantity if already in the cart.
    Add {
        /// Product identifier.
        #[arg(long)]
        id: String,

        /// Display title.
        #[arg(long)]
        title: String,

        /// Image URI.
        #[arg(long)]
        image_url: String,

        /// Unit price.
        #[arg(long, value_parser = parse_price)]
        price: f64,
    },
    /// Increase an item's quantity by one.
    Increment {
        /// Product identifier.
        id: String,
    },
    /// Decrease an item's quantity by one, removing it at zero.
    Decrement {
        /// Product identifier.
        id: String,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse a price, rejecting NaN and infinities.
fn parse_price(s: &str) -> Result<f64, String> {
    let price: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if price.is_finite() {
        Ok(price)
    } else {
        Err(format!("'{}' is not a finite price", s))
    }
}
