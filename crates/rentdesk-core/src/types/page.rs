//! Pagination types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

use super::Record;

/// One of the page sizes the table offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Thirty,
    Forty,
    Fifty,
}

impl PageSize {
    /// All supported sizes, smallest first.
    pub const ALL: [PageSize; 5] = [
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Thirty,
        PageSize::Forty,
        PageSize::Fifty,
    ];

    /// Validate a raw page size.
    pub fn new(value: usize) -> Result<Self, Error> {
        match value {
            10 => Ok(PageSize::Ten),
            20 => Ok(PageSize::Twenty),
            30 => Ok(PageSize::Thirty),
            40 => Ok(PageSize::Forty),
            50 => Ok(PageSize::Fifty),
            _ => Err(InvalidInputError::PageSize { value }.into()),
        }
    }

    /// Number of rows per page.
    pub fn get(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Thirty => 30,
            PageSize::Forty => 40,
            PageSize::Fifty => 50,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl FromStr for PageSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().parse::<usize>().map_err(|_| InvalidInputError::Other {
            message: format!("page size '{}' is not a number", s),
        })?;
        Self::new(value)
    }
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.get() as u64)
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = usize::deserialize(deserializer)?;
        PageSize::new(value).map_err(serde::de::Error::custom)
    }
}

/// Number of pages needed for `total_count` rows: `ceil(total / size)`.
pub fn page_count(total_count: usize, page_size: PageSize) -> usize {
    total_count.div_ceil(page_size.get())
}

/// Which window of the remote collection is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    /// Zero-based page index.
    pub page_index: usize,
    /// Rows per page.
    pub page_size: PageSize,
}

impl Pagination {
    /// Create a pagination state.
    pub fn new(page_index: usize, page_size: PageSize) -> Self {
        Self {
            page_index,
            page_size,
        }
    }

    /// Offset of the first row of this window in the remote collection.
    pub fn offset(&self) -> usize {
        self.page_index * self.page_size.get()
    }
}

/// The state snapshot a page fetch is issued for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PageQuery {
    pub pagination: Pagination,
}

impl PageQuery {
    /// Create a query for the given window.
    pub fn new(pagination: Pagination) -> Self {
        Self { pagination }
    }

    /// `limit` query parameter.
    pub fn limit(&self) -> usize {
        self.pagination.page_size.get()
    }

    /// `offset` query parameter.
    pub fn offset(&self) -> usize {
        self.pagination.offset()
    }
}

/// Raw page returned by a gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    /// Rows of the requested window, in server order.
    pub rows: Vec<Record>,
    /// Size of the whole remote collection.
    pub total_count: usize,
}

/// One fetched window plus the page count derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub rows: Vec<Record>,
    pub total_count: usize,
    pub page_count: usize,
}

impl PageResult {
    /// Derive the page result of a response fetched with `page_size`.
    pub fn from_response(response: PageResponse, page_size: PageSize) -> Self {
        Self {
            page_count: page_count(response.total_count, page_size),
            rows: response.rows,
            total_count: response.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_accepts_supported_values_only() {
        for size in PageSize::ALL {
            assert_eq!(PageSize::new(size.get()).unwrap(), size);
        }
        assert!(PageSize::new(0).is_err());
        assert!(PageSize::new(15).is_err());
        assert!(PageSize::new(100).is_err());
    }

    #[test]
    fn page_size_parses() {
        assert_eq!("30".parse::<PageSize>().unwrap(), PageSize::Thirty);
        assert!("thirty".parse::<PageSize>().is_err());
    }

    #[test]
    fn page_count_is_ceiling() {
        for size in PageSize::ALL {
            let n = size.get();
            assert_eq!(page_count(0, size), 0);
            assert_eq!(page_count(1, size), 1);
            assert_eq!(page_count(n, size), 1);
            assert_eq!(page_count(n + 1, size), 2);
            assert_eq!(page_count(10_000, size), 10_000usize.div_ceil(n));
        }
    }

    #[test]
    fn query_offset() {
        let query = PageQuery::new(Pagination::new(3, PageSize::Twenty));
        assert_eq!(query.limit(), 20);
        assert_eq!(query.offset(), 60);
    }

    #[test]
    fn page_result_derives_count() {
        let result = PageResult::from_response(
            PageResponse {
                rows: Vec::new(),
                total_count: 41,
            },
            PageSize::Ten,
        );
        assert_eq!(result.page_count, 5);
    }
}
