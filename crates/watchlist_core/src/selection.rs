//! Selection tracking for the watch table.
//!
//! Selection is kept by [`RowId`] so it follows rows through reorders. The
//! coordinator also owns the "remove" action availability and reports flips
//! as [`SelectionSignal`]s for the host to drain.

use crate::models::row::RowId;
use crate::store::RowStore;
use std::collections::BTreeSet;

/// How many rows a user may select at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    SingleRow,
    /// Ranges (shift) and toggles (ctrl) are allowed.
    #[default]
    MultiRow,
}

/// Inclusive span of row indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub top: usize,
    pub bottom: usize,
}

impl RowSpan {
    pub fn single(index: usize) -> Self {
        Self {
            top: index,
            bottom: index,
        }
    }

    pub fn row_count(&self) -> usize {
        self.bottom - self.top + 1
    }
}

/// Notifications emitted when selection-driven action state flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSignal {
    RemoveEnabled(bool),
}

/// Tracks selected rows, the current (focused) row, and remove availability.
#[derive(Debug, Clone, Default)]
pub struct SelectionCoordinator {
    policy: SelectionPolicy,
    selected: BTreeSet<RowId>,
    current: Option<RowId>,
    anchor: Option<RowId>,
    remove_enabled: bool,
    signals: Vec<SelectionSignal>,
}

impl SelectionCoordinator {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn is_selected(&self, id: RowId) -> bool {
        self.selected.contains(&id)
    }

    /// The focused row, which anchors programmatic inserts.
    pub fn current(&self) -> Option<RowId> {
        self.current
    }

    /// Whether the remove action should currently be enabled.
    pub fn remove_enabled(&self) -> bool {
        self.remove_enabled
    }

    /// Selected row ids in table order.
    pub fn selected_row_ids(&self, store: &RowStore) -> Vec<RowId> {
        store
            .rows()
            .iter()
            .map(|row| row.id)
            .filter(|id| self.selected.contains(id))
            .collect()
    }

    /// Selected rows grouped into contiguous index spans, top to bottom.
    pub fn selected_spans(&self, store: &RowStore) -> Vec<RowSpan> {
        let mut spans: Vec<RowSpan> = Vec::new();
        for (index, row) in store.rows().iter().enumerate() {
            if !self.selected.contains(&row.id) {
                continue;
            }
            match spans.last_mut() {
                Some(span) if span.bottom + 1 == index => span.bottom = index,
                _ => spans.push(RowSpan::single(index)),
            }
        }
        spans
    }

    /// Index where a programmatic "add" inserts: the current row, else the end.
    pub fn anchor_insert_index(&self, store: &RowStore) -> usize {
        self.current
            .and_then(|id| store.index_of(id))
            .unwrap_or_else(|| store.len())
    }

    /// Select exactly one row and make it current.
    pub fn select(&mut self, id: RowId) {
        self.selected.clear();
        self.selected.insert(id);
        self.current = Some(id);
        self.anchor = Some(id);
        self.sync_remove_enabled();
    }

    /// Add or remove one row from the selection (ctrl-click).
    ///
    /// Under [`SelectionPolicy::SingleRow`] this behaves like [`Self::select`].
    pub fn toggle(&mut self, id: RowId) {
        if self.policy == SelectionPolicy::SingleRow {
            self.select(id);
            return;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        self.current = Some(id);
        self.anchor = Some(id);
        self.sync_remove_enabled();
    }

    /// Select every row between the anchor and `id` (shift-click).
    ///
    /// Falls back to [`Self::select`] without an anchor or under
    /// [`SelectionPolicy::SingleRow`].
    pub fn extend_to(&mut self, store: &RowStore, id: RowId) {
        let span = match (self.policy, self.anchor.and_then(|a| store.index_of(a))) {
            (SelectionPolicy::MultiRow, Some(anchor)) => store.index_of(id).map(|target| {
                RowSpan {
                    top: anchor.min(target),
                    bottom: anchor.max(target),
                }
            }),
            _ => None,
        };
        let Some(span) = span else {
            self.select(id);
            return;
        };
        self.selected = store.rows()[span.top..=span.bottom]
            .iter()
            .map(|row| row.id)
            .collect();
        self.current = Some(id);
        self.sync_remove_enabled();
    }

    /// Move focus without touching the selection; `None` means "nothing focused".
    pub fn set_current(&mut self, id: Option<RowId>) {
        self.current = id;
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
        self.sync_remove_enabled();
    }

    /// Forget rows that are no longer in `store`.
    pub fn prune(&mut self, store: &RowStore) {
        self.selected.retain(|id| store.index_of(*id).is_some());
        if self.current.is_some_and(|id| store.index_of(id).is_none()) {
            self.current = None;
        }
        if self.anchor.is_some_and(|id| store.index_of(id).is_none()) {
            self.anchor = None;
        }
        self.sync_remove_enabled();
    }

    /// Re-select after rows were removed, given the smallest removed index.
    ///
    /// Selects the row that now occupies `removed_index`, or the new last row
    /// when nothing remains below it. An empty table clears the selection.
    pub fn land_after_removal(&mut self, store: &RowStore, removed_index: usize) {
        self.prune(store);
        let landing = removed_index.min(store.len().saturating_sub(1));
        match store.row_at(landing) {
            Some(row) => self.select(row.id),
            None => {
                self.clear();
                self.current = None;
            }
        }
    }

    /// Take the signals emitted since the last drain.
    pub fn drain_signals(&mut self) -> Vec<SelectionSignal> {
        std::mem::take(&mut self.signals)
    }

    fn sync_remove_enabled(&mut self) {
        let enabled = self.has_selection();
        if enabled != self.remove_enabled {
            self.remove_enabled = enabled;
            self.signals.push(SelectionSignal::RemoveEnabled(enabled));
        }
    }
}
