//! rentdesk - Command-line client for a rental inventory.
//!
//! A thin wrapper over `rentdesk-core`: it lists pages of products, prices
//! rentals, submits bookings and returns, and offers an interactive table.

mod backend;
mod cli;
mod commands;
mod output;
mod render;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{book, browse, estimate, products};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Products(cmd) => products::handle(cmd, &cli.connection).await,
        Commands::Estimate(args) => estimate::run(args),
        Commands::Book(args) => book::run_booking(args, &cli.connection).await,
        Commands::Return(args) => book::run_return(args, &cli.connection).await,
        Commands::Browse(args) => browse::run(args, &cli.connection).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so that stdout stays machine-readable.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
