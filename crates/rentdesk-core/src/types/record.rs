//! Inventory record type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an inventory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl RecordId {
    /// Returns the raw integer identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// One rentable product as served by the inventory API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier within a page.
    pub id: RecordId,

    /// Display name.
    pub name: String,

    /// Inventory code, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,

    /// Whether the product can currently be rented.
    pub availability: bool,

    /// Whether the product is flagged for repair.
    pub needing_repair: bool,

    /// Condition score.
    pub durability: f64,

    /// Usage counter.
    pub mileage: f64,

    /// Daily rate. Absent in sources that do not price products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// Nested records.
    #[serde(
        default,
        rename = "subRows",
        alias = "sub_rows",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub sub_rows: Vec<Record>,
}

impl Record {
    /// Create a record with no code, price or sub rows.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: None,
            availability: true,
            needing_repair: false,
            durability: 100.0,
            mileage: 0.0,
            price: None,
            sub_rows: Vec::new(),
        }
    }

    /// Set the daily rate.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Returns this record followed by all of its descendants, depth first.
    pub fn flatten(&self) -> Vec<&Record> {
        let mut out = vec![self];
        for child in &self.sub_rows {
            out.extend(child.flatten());
        }
        out
    }

    /// Returns the ids of all descendants (excluding this record).
    pub fn descendant_ids(&self) -> Vec<RecordId> {
        self.flatten().into_iter().skip(1).map(|r| r.id).collect()
    }
}
