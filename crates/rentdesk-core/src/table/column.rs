//! Table columns.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};
use crate::types::Record;

/// A data column of the product table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Name,
    Availability,
    NeedingRepair,
    Durability,
    Mileage,
    Price,
}

impl Column {
    /// Columns in display order.
    pub const ALL: [Column; 7] = [
        Column::Id,
        Column::Name,
        Column::Availability,
        Column::NeedingRepair,
        Column::Durability,
        Column::Mileage,
        Column::Price,
    ];

    /// Header label.
    pub fn header(self) -> &'static str {
        match self {
            Column::Id => "Id",
            Column::Name => "Name",
            Column::Availability => "Availability",
            Column::NeedingRepair => "Need to repair",
            Column::Durability => "Durability",
            Column::Mileage => "Mileage",
            Column::Price => "Price",
        }
    }

    /// Machine name, as accepted by [`Column::from_str`].
    pub fn key(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Name => "name",
            Column::Availability => "availability",
            Column::NeedingRepair => "needing_repair",
            Column::Durability => "durability",
            Column::Mileage => "mileage",
            Column::Price => "price",
        }
    }

    /// The cell text of `record` in this column.
    pub fn text(self, record: &Record) -> String {
        match self {
            Column::Id => record.id.to_string(),
            Column::Name => record.name.clone(),
            Column::Availability => record.availability.to_string(),
            Column::NeedingRepair => record.needing_repair.to_string(),
            Column::Durability => format_number(record.durability),
            Column::Mileage => format_number(record.mileage),
            Column::Price => record.price.map(format_number).unwrap_or_default(),
        }
    }

    /// Order two records by this column, ascending.
    ///
    /// Names compare case-insensitively; a missing price sorts first.
    pub fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            Column::Id => a.id.cmp(&b.id),
            Column::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Column::Availability => a.availability.cmp(&b.availability),
            Column::NeedingRepair => a.needing_repair.cmp(&b.needing_repair),
            Column::Durability => a.durability.total_cmp(&b.durability),
            Column::Mileage => a.mileage.total_cmp(&b.mileage),
            Column::Price => match (a.price, b.price) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

/// Integral values print without a fractional part.
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Column {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "id" => Ok(Column::Id),
            "name" => Ok(Column::Name),
            "availability" | "available" => Ok(Column::Availability),
            "needing_repair" | "repair" => Ok(Column::NeedingRepair),
            "durability" => Ok(Column::Durability),
            "mileage" => Ok(Column::Mileage),
            "price" | "rate" => Ok(Column::Price),
            _ => Err(InvalidInputError::Column {
                value: s.to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_text() {
        let mut record = Record::new(12, "Snowboard").with_price(19.5);
        record.durability = 80.0;
        record.mileage = 3.25;

        assert_eq!(Column::Id.text(&record), "12");
        assert_eq!(Column::Durability.text(&record), "80");
        assert_eq!(Column::Mileage.text(&record), "3.25");
        assert_eq!(Column::Price.text(&record), "19.5");
        assert_eq!(Column::Availability.text(&record), "true");
    }

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("needing-repair".parse::<Column>().unwrap(), Column::NeedingRepair);
        assert_eq!("Name".parse::<Column>().unwrap(), Column::Name);
        assert!("colour".parse::<Column>().is_err());
        for column in Column::ALL {
            assert_eq!(column.key().parse::<Column>().unwrap(), column);
        }
    }

    #[test]
    fn missing_price_sorts_first() {
        let priced = Record::new(1, "a").with_price(1.0);
        let unpriced = Record::new(2, "b");
        assert_eq!(Column::Price.compare(&unpriced, &priced), Ordering::Less);
    }
}
