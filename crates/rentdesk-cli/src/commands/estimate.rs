//! Rental price estimate.

use anyhow::{Context, Result, bail};
use clap::Args;

use rentdesk_core::{DateRange, parse_date, rental_days};

use crate::output;

#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Daily rate
    #[arg(long)]
    pub rate: f64,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub from: String,

    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    pub to: String,
}

pub fn run(args: EstimateArgs) -> Result<()> {
    if !args.rate.is_finite() || args.rate < 0.0 {
        bail!("Rate must be a non-negative number");
    }

    let from = parse_date(&args.from).context("Invalid --from")?;
    let to = parse_date(&args.to).context("Invalid --to")?;
    let range = DateRange::new(from, to);

    let price = range
        .estimate(args.rate)
        .context("Both dates are required")?;

    output::field("Days", &rental_days(from, to).to_string());
    output::field("Estimated price", &format!("{:.2}", price));
    Ok(())
}
