//! Rental price estimates.
//!
//! A price is `days * daily_rate`, where `days` is the whole number of days
//! between the two chosen dates, in either order. An unchosen date means
//! there is no estimate yet; it is never treated as a default date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidInputError, ValidationGap};
use crate::types::Record;

/// Number of whole days between two dates, regardless of order.
pub fn rental_days(from: NaiveDate, to: NaiveDate) -> u64 {
    (to - from).num_days().unsigned_abs()
}

/// Estimate the price of renting at `daily_rate` between two dates.
///
/// Returns `None` when either date is unset.
pub fn estimate_price(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    daily_rate: f64,
) -> Option<f64> {
    let (from, to) = (from?, to?);
    Some(rental_days(from, to) as f64 * daily_rate)
}

/// Parse a `YYYY-MM-DD` date as typed by a user.
pub fn parse_date(s: &str) -> Result<NaiveDate, InvalidInputError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| InvalidInputError::Date {
        value: s.to_string(),
        reason: e.to_string(),
    })
}

/// The pair of dates a user has picked so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// A range with both ends chosen.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Choose the start date.
    pub fn set_from(&mut self, date: NaiveDate) {
        self.from = Some(date);
    }

    /// Choose the end date.
    pub fn set_to(&mut self, date: NaiveDate) {
        self.to = Some(date);
    }

    /// Both dates, or the first one still missing.
    pub fn require(&self) -> Result<(NaiveDate, NaiveDate), ValidationGap> {
        let from = self.from.ok_or(ValidationGap::MissingFromDate)?;
        let to = self.to.ok_or(ValidationGap::MissingToDate)?;
        Ok((from, to))
    }

    /// Estimate at an explicit daily rate.
    pub fn estimate(&self, daily_rate: f64) -> Option<f64> {
        estimate_price(self.from, self.to, daily_rate)
    }

    /// Estimate for a record; `None` when it has no daily rate.
    pub fn estimate_for(&self, record: &Record) -> Option<f64> {
        record.price.and_then(|rate| self.estimate(rate))
    }
}
