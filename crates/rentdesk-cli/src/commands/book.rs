//! Booking and return commands.

use anyhow::{Context, Result, bail};
use clap::Args;

use rentdesk_core::{
    ActionDispatcher, DateRange, DispatchConfig, Record, RecordId, ReturnDetails, TargetPolicy,
    parse_date,
};

use crate::backend::Backend;
use crate::cli::ConnectionArgs;
use crate::output;

/// Which rows to act on and for which dates.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Page the product is on, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (10, 20, 30, 40 or 50)
    #[arg(long, default_value_t = 10)]
    pub page_size: usize,

    /// Product id; repeat with --batch to act on several
    #[arg(long = "product", required = true)]
    pub products: Vec<i64>,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub from: String,

    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    pub to: String,

    /// Submit one request per selected product
    #[arg(long)]
    pub batch: bool,
}

#[derive(Args, Debug)]
pub struct BookArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args, Debug)]
pub struct ReturnArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Distance or usage recorded during the rental
    #[arg(long)]
    pub mileage_used: u32,

    /// Flag the product for repair
    #[arg(long)]
    pub needs_repair: bool,
}

/// Selected records, dates and dispatcher for one submission.
struct Prepared {
    dispatcher: ActionDispatcher<Backend>,
    selection: Vec<Record>,
    range: DateRange,
}

async fn prepare(target: &TargetArgs, connection: &ConnectionArgs) -> Result<Prepared> {
    let from = parse_date(&target.from).context("Invalid --from")?;
    let to = parse_date(&target.to).context("Invalid --to")?;

    let backend = Backend::connect(connection)?;
    let session = super::load_page(backend, target.page, target.page_size)
        .await
        .context("Failed to load products")?;

    for &id in &target.products {
        let id = RecordId(id);
        let selected = session
            .update(|table| table.is_row_selected(id) || table.toggle_row_selected(id))
            .await;
        if !selected {
            bail!("Product {} is not on page {}", id, target.page);
        }
    }

    let selection = session
        .read(|table| table.selected_records())
        .await;
    let config = DispatchConfig {
        target_policy: if target.batch {
            TargetPolicy::Batch
        } else {
            TargetPolicy::Single
        },
    };

    Ok(Prepared {
        dispatcher: ActionDispatcher::new(session.gateway().clone(), config),
        selection,
        range: DateRange::new(from, to),
    })
}

fn report(outcomes: &[rentdesk_core::ActionOutcome]) -> Result<()> {
    match output::outcomes(outcomes) {
        0 => Ok(()),
        failed => bail!("{} of {} submissions failed", failed, outcomes.len()),
    }
}

pub async fn run_booking(args: BookArgs, connection: &ConnectionArgs) -> Result<()> {
    let prepared = prepare(&args.target, connection).await?;
    let outcomes = prepared
        .dispatcher
        .book(&prepared.selection, &prepared.range)
        .await;
    report(&outcomes)
}

pub async fn run_return(args: ReturnArgs, connection: &ConnectionArgs) -> Result<()> {
    let prepared = prepare(&args.target, connection).await?;
    let details = ReturnDetails {
        mileage_used: args.mileage_used,
        needs_repair: args.needs_repair,
    };
    let outcomes = prepared
        .dispatcher
        .return_products(&prepared.selection, &prepared.range, details)
        .await;
    report(&outcomes)
}
