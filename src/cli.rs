//! Command line interface of the `blockless` binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the Blockless Swap tool.
#[derive(Parser, Debug)]
#[command(name = "blockless")]
#[command(about = "Build and read Blockless Swap payment links")]
pub struct CliArgs {
    /// Path to the JSON configuration file [default: blockless.json if present]
    #[arg(long, short, env = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Single- or multi-leg `/swap` links
    #[command(subcommand)]
    Swap(SwapCommand),
    /// Merchant orders carried in `/order` links
    #[command(subcommand)]
    Order(OrderCommand),
    /// Saved merchant preferences
    #[command(subcommand)]
    Merchant(MerchantCommand),
    /// Wallet deeplinks for one transfer
    Deeplinks(DeeplinksArgs),
}

#[derive(Subcommand, Debug)]
pub enum SwapCommand {
    /// Print the swap link for the given legs
    Encode {
        /// Destination leg, `<chain>:<amount>:<token>:<address>`; repeatable
        #[arg(long, required = true)]
        dst: Vec<String>,
        /// Source leg, `<chain>:<amount>:<token>:<address>`
        #[arg(long)]
        src: Option<String>,
    },
    /// Parse a swap link or query string and print its legs
    Decode {
        /// Full URL, `?dst=...` query, or bare `dst=...` query
        input: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum OrderCommand {
    /// Build an order from the merchant preferences
    Create {
        /// Fiat value, e.g. `25` or `$25.00`
        #[arg(long)]
        fiat: String,
        /// Currency code; defaults to the merchant's currency
        #[arg(long)]
        currency: Option<String>,
        /// Payment option, `<chain>:<symbol>:<amount>`; repeatable
        #[arg(long, required = true)]
        pay: Vec<String>,
        /// Store the order as a session order and print its id instead of a link
        #[arg(long)]
        session: bool,
    },
    /// Decode an order and print it with its swap link and wallet deeplinks
    Show {
        /// Order URL, `?id=...` query, or raw blob
        #[arg(required_unless_present = "session", conflicts_with = "session")]
        input: Option<String>,
        /// Session order id
        #[arg(long)]
        session: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MerchantCommand {
    /// Print the merchant preferences
    Show,
    /// Set the fiat currency
    Currency { code: String },
    /// Add or replace an accepted chain
    Chain {
        name: String,
        /// Recipient address on that chain
        #[arg(long)]
        address: String,
        /// Token symbols to list, comma separated
        #[arg(long, value_delimiter = ',')]
        tokens: Vec<String>,
    },
    /// Stop accepting a chain
    RemoveChain { name: String },
}

#[derive(Args, Debug)]
pub struct DeeplinksArgs {
    #[arg(long)]
    pub chain: String,
    /// Token symbol known on the chain
    #[arg(long)]
    pub token: String,
    #[arg(long)]
    pub amount: String,
    /// Recipient address
    #[arg(long)]
    pub to: String,
}
