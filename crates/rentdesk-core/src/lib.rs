//! rentdesk-core - Table state, pricing and submissions for a rental inventory.
//!
//! The core crate is transport-agnostic. A [`Gateway`] fetches pages and
//! accepts bookings and returns; everything else (pagination, filtering,
//! sorting, selection, pricing and validation) lives here.
//!
//! # Example
//!
//! ```no_run
//! use rentdesk_core::{ControllerConfig, Gateway, TableSession};
//!
//! # async fn example(gateway: impl Gateway) -> Result<(), rentdesk_core::Error> {
//! let session = TableSession::new(gateway, ControllerConfig::default());
//! session.refresh().await;
//!
//! session.update(|table| table.next_page()).await;
//! session.sync().await;
//!
//! for row in session.view().rows {
//!     println!("{} {}", row.record.id, row.record.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod dispatch;
pub mod error;
pub mod pricing;
pub mod session;
pub mod table;
pub mod traits;
pub mod types;

pub use dispatch::{ActionDispatcher, ActionOutcome, DispatchConfig, ReturnDetails, TargetPolicy};
pub use error::{Error, InvalidInputError, NetworkError, StatusError, ValidationGap};
pub use pricing::{DateRange, estimate_price, parse_date, rental_days};
pub use session::TableSession;
pub use table::{
    Capabilities, CheckState, Column, ControllerConfig, FetchOutcome, PageSizePolicy, SortSpec,
    TableController, TableView,
};
pub use traits::Gateway;
pub use types::{
    ActionKind, ApiUrl, BookingRequest, PageQuery, PageResponse, PageSize, Pagination, Record,
    RecordId, ReturnRequest,
};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
