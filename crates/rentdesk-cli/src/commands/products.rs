//! Product listing.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use rentdesk_core::SortSpec;

use crate::backend::Backend;
use crate::cli::ConnectionArgs;
use crate::output;
use crate::render;

#[derive(Args, Debug)]
pub struct ProductsCommand {
    #[command(subcommand)]
    pub command: ProductsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProductsSubcommand {
    /// Show one page of products
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (10, 20, 30, 40 or 50)
    #[arg(long, default_value_t = 10)]
    pub page_size: usize,

    /// Fuzzy filter over the rows of the page
    #[arg(long)]
    pub filter: Option<String>,

    /// Sort the page by a column, e.g. `mileage` or `price:desc`
    #[arg(long)]
    pub sort: Option<String>,

    /// Print the table view as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle(cmd: ProductsCommand, connection: &ConnectionArgs) -> Result<()> {
    match cmd.command {
        ProductsSubcommand::List(args) => list(args, connection).await,
    }
}

async fn list(args: ListArgs, connection: &ConnectionArgs) -> Result<()> {
    let sort = args
        .sort
        .as_deref()
        .map(str::parse::<SortSpec>)
        .transpose()
        .context("Invalid --sort")?;

    let backend = Backend::connect(connection)?;
    let session = super::load_page(backend, args.page, args.page_size)
        .await
        .context("Failed to load products")?;

    session
        .update(|table| {
            if let Some(filter) = &args.filter {
                table.set_global_filter(filter.as_str());
            }
            table.set_sort(sort);
        })
        .await;

    let view = session.view();
    if args.json {
        output::json_pretty(&view)?;
    } else {
        println!("{}", render::table(&view));
    }

    Ok(())
}
