//! Booking and return request bodies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::RecordId;

/// Which workflow a submission belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Booking,
    Return,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Booking => write!(f, "Booking"),
            ActionKind::Return => write!(f, "Return"),
        }
    }
}

/// Body of `POST /api/v1/bookings/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub price: f64,
    pub product: RecordId,
}

/// Body of `POST /api/v1/returns/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRequest {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub price: f64,
    pub product: RecordId,
    pub mileage_used: u32,
    pub needs_repair: bool,
}
