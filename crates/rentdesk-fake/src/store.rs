//! In-memory storage for the fake gateway.

use tracing::{debug, instrument};

use rentdesk_core::{
    BookingRequest, PageQuery, PageResponse, Record, RecordId, Result, ReturnRequest, StatusError,
};

/// Everything the fake backend has accepted so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submissions {
    pub bookings: Vec<BookingRequest>,
    pub returns: Vec<ReturnRequest>,
}

/// Inventory plus accepted submissions.
#[derive(Debug, Clone)]
pub(crate) struct MemoryStore {
    inventory: Vec<Record>,
    submissions: Submissions,
}

fn find_mut(rows: &mut [Record], id: RecordId) -> Option<&mut Record> {
    for row in rows {
        if row.id == id {
            return Some(row);
        }
        if let Some(found) = find_mut(&mut row.sub_rows, id) {
            return Some(found);
        }
    }
    None
}

fn unknown_product(id: RecordId) -> StatusError {
    StatusError::new(400, Some(format!("unknown product {}", id)))
}

impl MemoryStore {
    pub(crate) fn new(inventory: Vec<Record>) -> Self {
        Self {
            inventory,
            submissions: Submissions::default(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.inventory.len()
    }

    pub(crate) fn submissions(&self) -> &Submissions {
        &self.submissions
    }

    /// One window of top-level rows.
    pub(crate) fn page(&self, query: &PageQuery) -> PageResponse {
        let total = self.inventory.len();
        let start = query.offset().min(total);
        let end = start.saturating_add(query.limit()).min(total);
        PageResponse {
            rows: self.inventory[start..end].to_vec(),
            total_count: total,
        }
    }

    /// Record a booking and mark the product as rented out.
    #[instrument(skip(self, request), fields(product = %request.product))]
    pub(crate) fn book(&mut self, request: &BookingRequest) -> Result<()> {
        let product = find_mut(&mut self.inventory, request.product)
            .ok_or_else(|| unknown_product(request.product))?;
        product.availability = false;
        self.submissions.bookings.push(request.clone());
        debug!("booking stored");
        Ok(())
    }

    /// Record a return and apply its wear to the product.
    #[instrument(skip(self, request), fields(product = %request.product))]
    pub(crate) fn return_product(&mut self, request: &ReturnRequest) -> Result<()> {
        let product = find_mut(&mut self.inventory, request.product)
            .ok_or_else(|| unknown_product(request.product))?;
        product.availability = true;
        product.mileage += f64::from(request.mileage_used);
        product.needing_repair = request.needs_repair;
        self.submissions.returns.push(request.clone());
        debug!("return stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rentdesk_core::{Error, PageSize, Pagination};

    fn store() -> MemoryStore {
        let mut parent = Record::new(1, "Set");
        parent.sub_rows.push(Record::new(2, "Part"));
        MemoryStore::new(vec![parent, Record::new(3, "Tent")])
    }

    fn dates() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
        )
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let store = store();
        let query = PageQuery::new(Pagination::new(5, PageSize::Ten));
        let page = store.page(&query);
        assert!(page.rows.is_empty());
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn return_updates_nested_product() {
        let mut store = store();
        let (from_date, to_date) = dates();
        store
            .return_product(&ReturnRequest {
                from_date,
                to_date,
                price: 3.0,
                product: RecordId(2),
                mileage_used: 15,
                needs_repair: true,
            })
            .unwrap();

        let part = &store.inventory[0].sub_rows[0];
        assert_eq!(part.mileage, 15.0);
        assert!(part.needing_repair);
        assert_eq!(store.submissions().returns.len(), 1);
    }

    #[test]
    fn unknown_product_is_rejected() {
        let mut store = store();
        let (from_date, to_date) = dates();
        let err = store
            .book(&BookingRequest {
                from_date,
                to_date,
                price: 3.0,
                product: RecordId(99),
            })
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedStatus(ref s) if s.status == 400));
        assert!(store.submissions().bookings.is_empty());
    }
}
