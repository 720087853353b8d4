//! Core rentdesk types.
//!
//! These types enforce their invariants at construction time: a page size
//! outside the supported set or a malformed API URL cannot be represented.

mod action;
mod api_url;
mod page;
mod record;

pub use action::{ActionKind, BookingRequest, ReturnRequest};
pub use api_url::ApiUrl;
pub use page::{PageQuery, PageResponse, PageResult, PageSize, Pagination, page_count};
pub use record::{Record, RecordId};
