//! Read-only projection of the table state for rendering.

use serde::Serialize;

use crate::types::{PageSize, Record, RecordId};

use super::{Capabilities, CheckState, DataFetchError, MatchRank, SortSpec};

/// One rendered row. Sub rows follow their parent with a greater depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub record: Record,
    pub check: CheckState,
    /// Nesting level; 0 for rows of the page itself.
    pub depth: usize,
    /// Filter score, when a filter is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<MatchRank>,
}

/// Everything a presentation layer needs to draw the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableView {
    pub rows: Vec<RowView>,
    /// Header checkbox over the visible top-level rows.
    pub header_check: CheckState,
    pub page_index: usize,
    pub page_size: PageSize,
    /// `None` until the first page has loaded.
    pub page_count: Option<usize>,
    pub total_count: Option<usize>,
    pub global_filter: String,
    pub sort: Option<SortSpec>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub can_previous_page: bool,
    pub can_next_page: bool,
    pub selected_count: usize,
    /// Ids of all selected rows, including those on other pages.
    pub selected: Vec<RecordId>,
    pub capabilities: Capabilities,
}

impl TableView {
    /// "Page X of Y" label, with `?` for an unknown page count and
    /// "Page 0 of 0" for an empty collection.
    pub fn page_label(&self) -> String {
        match self.page_count {
            Some(0) => "Page 0 of 0".to_string(),
            Some(count) => format!("Page {} of {}", self.page_index + 1, count),
            None => format!("Page {} of ?", self.page_index + 1),
        }
    }

    pub(crate) fn with_error(mut self, error: Option<&DataFetchError>) -> Self {
        self.error = error.map(ToString::to_string);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_label() {
        let mut view = TableView::default();
        assert_eq!(view.page_label(), "Page 1 of ?");
        view.page_index = 2;
        view.page_count = Some(7);
        assert_eq!(view.page_label(), "Page 3 of 7");
    }

    #[test]
    fn empty_collection_has_no_pages() {
        let view = TableView {
            page_count: Some(0),
            total_count: Some(0),
            ..TableView::default()
        };
        assert_eq!(view.page_label(), "Page 0 of 0");
    }
}
