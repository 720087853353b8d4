//! Client-side sorting of the loaded page.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::types::Record;

use super::Column;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort by one column in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }

    /// The spec after clicking `column`: ascending, then descending, then unsorted.
    pub fn toggle(current: Option<SortSpec>, column: Column) -> Option<SortSpec> {
        match current {
            Some(spec) if spec.column == column => match spec.direction {
                SortDirection::Ascending => Some(SortSpec::descending(column)),
                SortDirection::Descending => None,
            },
            _ => Some(SortSpec::ascending(column)),
        }
    }

    /// Order two records under this spec.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let ordering = self.column.compare(a, b);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Stable sort of `rows`, so equal keys keep their incoming order.
    pub fn apply(&self, rows: &mut [&Record]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => write!(f, "{}:asc", self.column),
            SortDirection::Descending => write!(f, "{}:desc", self.column),
        }
    }
}

/// Parses `column`, `column:asc` or `column:desc`.
impl FromStr for SortSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = s.split_once(':').unwrap_or((s, "asc"));
        let column: Column = column.parse()?;
        match direction.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortSpec::ascending(column)),
            "desc" | "descending" => Ok(SortSpec::descending(column)),
            other => Err(crate::error::InvalidInputError::Other {
                message: format!("unknown sort direction '{}'", other),
            }
            .into()),
        }
    }
}
