//! Row selection.

use serde::{Deserialize, Serialize};

use crate::types::{Record, RecordId};

/// State of a tri-state checkbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    #[default]
    Unchecked,
    Checked,
    /// Some but not all of the covered rows are selected.
    Indeterminate,
}

impl CheckState {
    /// State of a box covering `total` rows of which `selected` are selected.
    pub fn from_counts(selected: usize, total: usize) -> Self {
        if selected == 0 || total == 0 {
            CheckState::Unchecked
        } else if selected >= total {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }
}

/// Selected rows, keyed by id and kept in selection order.
///
/// A snapshot of every selected record is held so that rows selected on
/// another page can still be priced and submitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    selected: Vec<Record>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selected.iter().any(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected records, oldest selection first.
    pub fn records(&self) -> &[Record] {
        &self.selected
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.selected.iter().map(|r| r.id).collect()
    }

    /// Selected records not already covered by a selected ancestor, in
    /// selection order. These are the rows actions apply to.
    pub fn targets(&self) -> Vec<Record> {
        let covered: Vec<RecordId> = self
            .selected
            .iter()
            .flat_map(|r| r.descendant_ids())
            .collect();
        self.selected
            .iter()
            .filter(|r| !covered.contains(&r.id))
            .cloned()
            .collect()
    }

    /// Look up the snapshot of a selected record.
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.selected.iter().find(|r| r.id == id)
    }

    /// Select `record` and its descendants. Returns whether anything changed.
    pub fn select(&mut self, record: &Record) -> bool {
        let mut changed = false;
        for row in record.flatten() {
            if !self.is_selected(row.id) {
                self.selected.push(row.clone());
                changed = true;
            }
        }
        changed
    }

    /// Deselect `record` and its descendants. Returns whether anything changed.
    pub fn deselect(&mut self, record: &Record) -> bool {
        let ids: Vec<RecordId> = record.flatten().iter().map(|r| r.id).collect();
        let before = self.selected.len();
        self.selected.retain(|r| !ids.contains(&r.id));
        before != self.selected.len()
    }

    /// Flip the selection of `record` (and its descendants).
    pub fn toggle(&mut self, record: &Record) -> bool {
        if self.is_selected(record.id) {
            self.deselect(record)
        } else {
            self.select(record)
        }
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Checkbox state of one row: indeterminate when the row itself is not
    /// selected but some of its descendants are.
    pub fn row_state(&self, record: &Record) -> CheckState {
        if self.is_selected(record.id) {
            return CheckState::Checked;
        }
        if record.descendant_ids().into_iter().any(|id| self.is_selected(id)) {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }

    /// Checkbox state of a header covering `rows`.
    pub fn header_state<'a>(&self, rows: impl IntoIterator<Item = &'a Record>) -> CheckState {
        let (selected, total) = rows.into_iter().fold((0, 0), |(selected, total), row| {
            let hit = usize::from(self.is_selected(row.id));
            (selected + hit, total + 1)
        });
        CheckState::from_counts(selected, total)
    }
}
