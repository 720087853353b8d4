//! Table state: pagination, filtering, sorting and selection.

mod column;
mod controller;
pub mod filter;
mod selection;
mod sort;
mod view;

pub use column::Column;
pub use controller::{
    Capabilities, ControllerConfig, DataFetchError, FetchOutcome, FetchTicket, PageSizePolicy,
    TableController,
};
pub use filter::MatchRank;
pub use selection::{CheckState, SelectionState};
pub use sort::{SortDirection, SortSpec};
pub use view::{RowView, TableView};
