//! Table-state controller.
//!
//! The controller is the single owner of pagination, filter, sort and
//! selection state for one table. It never talks to the network itself:
//! callers issue a [`FetchTicket`] with [`TableController::begin_fetch`],
//! run the fetch, and hand the result back to
//! [`TableController::complete_fetch`], which discards any response that no
//! longer matches the current state.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::error::Error;
use crate::types::{
    PageQuery, PageResponse, PageResult, PageSize, Pagination, Record, RecordId, page_count,
};

use super::filter::{self, MatchRank};
use super::view::{RowView, TableView};
use super::{CheckState, Column, SelectionState, SortSpec};

/// Which optional behaviours a table offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub filtering: bool,
    pub selection: bool,
    pub sorting: bool,
}

impl Capabilities {
    /// Everything enabled.
    pub fn all() -> Self {
        Self {
            filtering: true,
            selection: true,
            sorting: true,
        }
    }

    /// Plain paginated listing.
    pub fn none() -> Self {
        Self {
            filtering: false,
            selection: false,
            sorting: false,
        }
    }

    pub fn with_filtering(mut self, enabled: bool) -> Self {
        self.filtering = enabled;
        self
    }

    pub fn with_selection(mut self, enabled: bool) -> Self {
        self.selection = enabled;
        self
    }

    pub fn with_sorting(mut self, enabled: bool) -> Self {
        self.sorting = enabled;
        self
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

/// What happens to the page index when the page size changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSizePolicy {
    /// Land on the page that contains the first row of the old window.
    #[default]
    KeepFirstVisible,
    /// Go back to the first page.
    Reset,
}

/// Controller settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub page_size: PageSize,
    pub capabilities: Capabilities,
    pub page_size_policy: PageSizePolicy,
}

/// The state snapshot one fetch was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    query: PageQuery,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &PageQuery {
        &self.query
    }
}

/// A failed page fetch. The last good page stays visible.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFetchError {
    pub query: PageQuery,
    pub error: Error,
}

impl fmt::Display for DataFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to load page {}: {}",
            self.query.pagination.page_index + 1,
            self.error
        )
    }
}

impl std::error::Error for DataFetchError {}

/// Result of handing a fetch back to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The page is now shown. `refetch` is set when the page index moved
    /// afterwards (deferred navigation or clamping) and a new fetch is due.
    Applied { refetch: bool },
    /// The fetch was superseded; its response was discarded.
    Stale,
    /// The fetch failed; the previous page is still shown.
    Failed(DataFetchError),
}

/// Owner of the pagination, filter, sort and selection state of one table.
#[derive(Debug, Clone)]
pub struct TableController {
    config: ControllerConfig,
    pagination: Pagination,
    global_filter: String,
    sort: Option<SortSpec>,
    selection: SelectionState,
    page: Option<PageResult>,
    loaded_query: Option<PageQuery>,
    pending_page: Option<usize>,
    generation: u64,
    in_flight: Option<FetchTicket>,
    last_error: Option<DataFetchError>,
}

impl TableController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            pagination: Pagination::new(0, config.page_size),
            config,
            global_filter: String::new(),
            sort: None,
            selection: SelectionState::new(),
            page: None,
            loaded_query: None,
            pending_page: None,
            generation: 0,
            in_flight: None,
            last_error: None,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        self.config.capabilities
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// The query a fetch issued now would carry.
    pub fn query(&self) -> PageQuery {
        PageQuery::new(self.pagination)
    }

    pub fn global_filter(&self) -> &str {
        &self.global_filter
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// The last successfully loaded page.
    pub fn page(&self) -> Option<&PageResult> {
        self.page.as_ref()
    }

    pub fn last_error(&self) -> Option<&DataFetchError> {
        self.last_error.as_ref()
    }

    /// A navigation waiting for the page count to become known.
    pub fn pending_page(&self) -> Option<usize> {
        self.pending_page
    }

    /// True while the latest fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Page count for the current page size, once any page has loaded.
    pub fn page_count(&self) -> Option<usize> {
        self.page
            .as_ref()
            .map(|page| page_count(page.total_count, self.pagination.page_size))
    }

    pub fn total_count(&self) -> Option<usize> {
        self.page.as_ref().map(|page| page.total_count)
    }

    /// True when the shown page does not match the current query and no
    /// fetch for it is outstanding.
    pub fn needs_fetch(&self) -> bool {
        let query = self.query();
        self.loaded_query != Some(query)
            && self.in_flight.map(|ticket| ticket.query) != Some(query)
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    /// Go to page `index`, clamped to the known page range.
    ///
    /// While the page count is unknown the request is kept as pending and
    /// applied once a fetch resolves. Returns whether the page index changed.
    pub fn set_page(&mut self, index: usize) -> bool {
        let Some(count) = self.page_count() else {
            debug!(index, "page count unknown, deferring navigation");
            self.pending_page = Some(index);
            return false;
        };

        self.pending_page = None;
        let clamped = index.min(count.saturating_sub(1));
        if clamped == self.pagination.page_index {
            return false;
        }

        debug!(from = self.pagination.page_index, to = clamped, "changing page");
        self.pagination.page_index = clamped;
        true
    }

    pub fn first_page(&mut self) -> bool {
        self.set_page(0)
    }

    pub fn previous_page(&mut self) -> bool {
        let current = self.pending_page.unwrap_or(self.pagination.page_index);
        self.set_page(current.saturating_sub(1))
    }

    pub fn next_page(&mut self) -> bool {
        let current = self.pending_page.unwrap_or(self.pagination.page_index);
        self.set_page(current.saturating_add(1))
    }

    /// Go to the last page; deferred until the page count is known.
    pub fn last_page(&mut self) -> bool {
        match self.page_count() {
            Some(count) => self.set_page(count.saturating_sub(1)),
            None => self.set_page(usize::MAX),
        }
    }

    pub fn can_previous_page(&self) -> bool {
        self.pagination.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.page_count()
            .is_some_and(|count| self.pagination.page_index + 1 < count)
    }

    /// Change the page size, moving the page index per the configured policy.
    pub fn set_page_size(&mut self, size: PageSize) -> bool {
        let old = self.pagination;
        if old.page_size == size {
            return false;
        }

        let index = match self.config.page_size_policy {
            PageSizePolicy::KeepFirstVisible => old.offset() / size.get(),
            PageSizePolicy::Reset => 0,
        };

        self.pending_page = match self.config.page_size_policy {
            PageSizePolicy::KeepFirstVisible => self
                .pending_page
                .map(|pending| pending.saturating_mul(old.page_size.get()) / size.get()),
            PageSizePolicy::Reset => None,
        };

        self.pagination.page_size = size;
        self.pagination.page_index = match self.page_count() {
            Some(count) => index.min(count.saturating_sub(1)),
            None => index,
        };

        debug!(
            size = size.get(),
            page_index = self.pagination.page_index,
            "changed page size"
        );
        true
    }

    // ========================================================================
    // Filtering and sorting
    // ========================================================================

    /// Set the global filter text. Returns whether it changed.
    pub fn set_global_filter(&mut self, text: impl Into<String>) -> bool {
        if !self.config.capabilities.filtering {
            debug!("filtering disabled, ignoring filter");
            return false;
        }
        let text = text.into();
        if text == self.global_filter {
            return false;
        }
        self.global_filter = text;
        true
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> bool {
        if !self.config.capabilities.sorting {
            debug!("sorting disabled, ignoring sort");
            return false;
        }
        if sort == self.sort {
            return false;
        }
        self.sort = sort;
        true
    }

    /// Cycle the sort on `column`: ascending, descending, unsorted.
    pub fn toggle_sort(&mut self, column: Column) -> bool {
        self.set_sort(SortSpec::toggle(self.sort, column))
    }

    /// Rows of the loaded page after filtering and ordering, with their rank.
    pub fn ranked_rows(&self) -> Vec<(&Record, Option<MatchRank>)> {
        let Some(page) = self.page.as_ref() else {
            return Vec::new();
        };

        let filtering =
            self.config.capabilities.filtering && filter::is_active(&self.global_filter);
        let sort = self.sort.filter(|_| self.config.capabilities.sorting);

        if !filtering {
            let mut rows: Vec<&Record> = page.rows.iter().collect();
            if let Some(spec) = sort {
                spec.apply(&mut rows);
            }
            return rows.into_iter().map(|r| (r, None)).collect();
        }

        let mut ranked = filter::filter_rows(&page.rows, &self.global_filter);
        match sort {
            Some(spec) => {
                let mut rows: Vec<(&Record, MatchRank)> =
                    ranked.iter().map(|(i, rank)| (&page.rows[*i], *rank)).collect();
                rows.sort_by(|a, b| spec.compare(a.0, b.0));
                rows.into_iter().map(|(r, rank)| (r, Some(rank))).collect()
            }
            None => {
                filter::order_by_rank(&mut ranked);
                ranked
                    .into_iter()
                    .map(|(i, rank)| (&page.rows[i], Some(rank)))
                    .collect()
            }
        }
    }

    /// Rows of the loaded page after filtering and ordering.
    pub fn visible_rows(&self) -> Vec<&Record> {
        self.ranked_rows().into_iter().map(|(r, _)| r).collect()
    }

    // ========================================================================
    // Selection
    // ========================================================================

    fn find_loaded(&self, id: RecordId) -> Option<&Record> {
        self.page
            .as_ref()?
            .rows
            .iter()
            .flat_map(|row| row.flatten())
            .find(|row| row.id == id)
    }

    /// Flip the selection of a row of the loaded page, or of a row selected
    /// earlier on another page. Returns whether anything changed.
    pub fn toggle_row_selected(&mut self, id: RecordId) -> bool {
        if !self.config.capabilities.selection {
            debug!("selection disabled, ignoring toggle");
            return false;
        }
        let record = self
            .find_loaded(id)
            .or_else(|| self.selection.get(id))
            .cloned();
        match record {
            Some(record) => self.selection.toggle(&record),
            None => {
                debug!(%id, "row not loaded, ignoring toggle");
                false
            }
        }
    }

    /// Select every visible row of the loaded page, or deselect them all if
    /// they are already all selected. Rows on other pages are untouched.
    pub fn toggle_all_rows_selected(&mut self) -> bool {
        if !self.config.capabilities.selection {
            debug!("selection disabled, ignoring toggle all");
            return false;
        }
        let visible: Vec<Record> = self.visible_rows().into_iter().cloned().collect();
        if visible.is_empty() {
            return false;
        }

        let all_selected = visible.iter().all(|r| self.selection.is_selected(r.id));
        let mut changed = false;
        for record in &visible {
            changed |= if all_selected {
                self.selection.deselect(record)
            } else {
                self.selection.select(record)
            };
        }
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selection.clear()
    }

    pub fn is_row_selected(&self, id: RecordId) -> bool {
        self.selection.is_selected(id)
    }

    /// Snapshots of the selected records, in selection order. Sub rows
    /// selected along with their parent are left out; the parent stands
    /// for them.
    pub fn selected_records(&self) -> Vec<Record> {
        self.selection.targets()
    }

    /// Header checkbox over the visible rows.
    pub fn header_check_state(&self) -> CheckState {
        self.selection.header_state(self.visible_rows())
    }

    /// Checkbox of one row; `None` when the row is neither loaded nor selected.
    pub fn row_check_state(&self, id: RecordId) -> Option<CheckState> {
        self.find_loaded(id)
            .map(|record| self.selection.row_state(record))
            .or_else(|| self.selection.get(id).map(|_| CheckState::Checked))
    }

    // ========================================================================
    // Fetching
    // ========================================================================

    /// Issue a ticket for fetching the current query. Any earlier ticket
    /// becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            query: self.query(),
        };
        debug!(
            generation = ticket.generation,
            page_index = ticket.query.pagination.page_index,
            "issuing fetch"
        );
        self.in_flight = Some(ticket);
        ticket
    }

    /// Forget an outstanding ticket whose fetch was abandoned.
    pub fn cancel_fetch(&mut self, ticket: &FetchTicket) {
        if self.in_flight.as_ref() == Some(ticket) {
            self.in_flight = None;
        }
    }

    /// Apply the result of a fetch issued with `ticket`.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: crate::Result<PageResponse>,
    ) -> FetchOutcome {
        let latest = self.in_flight.map(|t| t.generation) == Some(ticket.generation);
        if !latest || ticket.query != self.query() {
            if latest {
                self.in_flight = None;
            }
            debug!(
                generation = ticket.generation,
                page_index = ticket.query.pagination.page_index,
                "discarding stale response"
            );
            return FetchOutcome::Stale;
        }

        self.in_flight = None;

        match result {
            Ok(response) => {
                let page = PageResult::from_response(response, ticket.query.pagination.page_size);
                let count = page.page_count;
                self.page = Some(page);
                self.loaded_query = Some(ticket.query);
                self.last_error = None;

                let target = self.pending_page.take().unwrap_or(self.pagination.page_index);
                let clamped = target.min(count.saturating_sub(1));
                let refetch = clamped != self.pagination.page_index;
                if refetch {
                    debug!(to = clamped, "moving to deferred or clamped page");
                    self.pagination.page_index = clamped;
                }
                FetchOutcome::Applied { refetch }
            }
            Err(error) => {
                let failure = DataFetchError {
                    query: ticket.query,
                    error,
                };
                warn!(error = %failure, "page fetch failed, keeping last good page");
                self.last_error = Some(failure.clone());
                FetchOutcome::Failed(failure)
            }
        }
    }

    // ========================================================================
    // Projection
    // ========================================================================

    fn push_row(
        &self,
        rows: &mut Vec<RowView>,
        record: &Record,
        rank: Option<MatchRank>,
        depth: usize,
        query: Option<&str>,
    ) {
        rows.push(RowView {
            check: self.selection.row_state(record),
            record: record.clone(),
            rank,
            depth,
        });
        for child in &record.sub_rows {
            match query {
                Some(query) => {
                    let rank = filter::rank_tree(child, query);
                    if rank.passed() {
                        self.push_row(rows, child, Some(rank), depth + 1, Some(query));
                    }
                }
                None => self.push_row(rows, child, None, depth + 1, None),
            }
        }
    }

    /// Snapshot of everything the presentation layer renders.
    pub fn view(&self) -> TableView {
        let ranked = self.ranked_rows();
        let header_check = self
            .selection
            .header_state(ranked.iter().map(|(record, _)| *record));

        let query = (self.config.capabilities.filtering && filter::is_active(&self.global_filter))
            .then(|| self.global_filter.trim());

        let mut rows = Vec::with_capacity(ranked.len());
        for (record, rank) in ranked {
            self.push_row(&mut rows, record, rank, 0, query);
        }

        TableView {
            header_check,
            rows,
            page_index: self.pagination.page_index,
            page_size: self.pagination.page_size,
            page_count: self.page_count(),
            total_count: self.total_count(),
            global_filter: self.global_filter.clone(),
            sort: self.sort,
            loading: self.is_loading(),
            error: None,
            can_previous_page: self.can_previous_page(),
            can_next_page: self.can_next_page(),
            selected_count: self.selection.len(),
            selected: self.selection.ids(),
            capabilities: self.config.capabilities,
        }
        .with_error(self.last_error.as_ref())
    }
}

impl Default for TableController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}
