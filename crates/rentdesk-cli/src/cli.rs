//! CLI argument definitions.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::commands::book::{BookArgs, ReturnArgs};
use crate::commands::browse::BrowseArgs;
use crate::commands::estimate::EstimateArgs;
use crate::commands::products::ProductsCommand;

/// Browse, price, book and return rental inventory.
#[derive(Parser, Debug)]
#[command(name = "rentdesk")]
#[command(author, version = env!("RENTDESK_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the inventory lives.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// API base URL; memory:// serves generated inventory
    #[arg(
        long = "api",
        env = "RENTDESK_API",
        default_value = "http://localhost:8000",
        global = true
    )]
    pub api: String,

    /// Request timeout in seconds
    #[arg(long, env = "RENTDESK_TIMEOUT", default_value_t = 30, global = true)]
    pub timeout_secs: u64,
}

impl ConnectionArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Product listing
    Products(ProductsCommand),

    /// Price a rental without submitting anything
    Estimate(EstimateArgs),

    /// Book a product from a page
    Book(BookArgs),

    /// Return a product from a page
    Return(ReturnArgs),

    /// Interactive table
    Browse(BrowseArgs),
}
