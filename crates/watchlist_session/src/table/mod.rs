//! Watch table: rows, selection, and the evaluator session behind one view.
//!
//! Every user-facing table action lives here. Actions mutate the
//! [`RowStore`] and then push the new watch set when the evaluable
//! expressions changed. Rendering is left to the host, which reads rows,
//! fonts, and action state through the accessors.

mod font;

pub use font::{CellFont, TableFont};

use crate::backend::EvaluatorHandle;
use crate::clipboard::Clipboard;
use crate::session::EvalSession;
use tracing::debug;
use watchlist_core::reorder::{
    classify_drag, resolve_drop, DragPayload, DropAction, DropOutcome, DropTarget,
};
use watchlist_core::{
    ExpressionEdit, RowId, RowStore, SelectionCoordinator, SelectionPolicy, SelectionSignal,
    WatchEntry, WatchlistError,
};

/// Enabled state of the table's context-menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextMenuState {
    pub copy_value_enabled: bool,
    pub add_enabled: bool,
    pub remove_enabled: bool,
    pub remove_all_enabled: bool,
}

/// One watch table bound to (at most) one evaluator connection.
#[derive(Debug)]
pub struct WatchTable {
    store: RowStore,
    selection: SelectionCoordinator,
    session: EvalSession,
    font: TableFont,
}

impl WatchTable {
    pub fn new(policy: SelectionPolicy, debugger_only: bool) -> Self {
        Self {
            store: RowStore::new(),
            selection: SelectionCoordinator::new(policy),
            session: EvalSession::new(debugger_only),
            font: TableFont::default(),
        }
    }

    /// Table pre-populated from persisted expressions.
    pub fn with_expressions<I, S>(
        policy: SelectionPolicy,
        debugger_only: bool,
        expressions: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new(policy, debugger_only);
        table.store.set_expressions(expressions);
        table
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionCoordinator {
        &self.selection
    }

    pub fn session(&self) -> &EvalSession {
        &self.session
    }

    pub fn font(&self) -> &TableFont {
        &self.font
    }

    /// Expressions of this table in watch order.
    pub fn expressions(&self) -> Vec<String> {
        self.store.snapshot_expressions()
    }

    /// Connect to an evaluator and evaluate the current rows right away.
    pub fn attach(&mut self, handle: EvaluatorHandle) {
        self.session.attach(handle);
        self.session.request_refresh(&self.store, true);
    }

    pub fn detach(&mut self) -> Option<EvaluatorHandle> {
        self.session.detach()
    }

    pub fn set_debugger_only(&mut self, debugger_only: bool) {
        self.session.set_debugger_only(debugger_only);
    }

    // ---- row actions ----

    /// Insert a pending row at the anchor (current row, else the end) and
    /// make it the selected, current row.
    ///
    /// Pending rows are not evaluated until an expression is committed.
    pub fn add(&mut self) -> RowId {
        let at = self.selection.anchor_insert_index(&self.store);
        let id = self.store.insert(at, None);
        self.selection.select(id);
        debug!(index = at, "added pending row");
        id
    }

    /// Commit edited text to a row's expression.
    ///
    /// # Errors
    /// Returns [`WatchlistError::UnknownRow`] when `id` is not in the table.
    pub fn commit_edit(
        &mut self,
        id: RowId,
        text: &str,
    ) -> Result<ExpressionEdit, WatchlistError> {
        let revision = self.store.revision();
        let was_selected = self.selection.is_selected(id);
        let edit = self.store.set_expression(id, text)?;
        match edit {
            ExpressionEdit::Removed { index } if was_selected => {
                self.selection.land_after_removal(&self.store, index);
            }
            ExpressionEdit::Removed { .. } => self.selection.prune(&self.store),
            _ => {}
        }
        self.push_if_changed(revision);
        Ok(edit)
    }

    /// Remove every selected row.
    ///
    /// The selection then lands on the row now occupying the topmost removed
    /// position, or on the new last row.
    ///
    /// # Returns
    /// Number of removed rows.
    pub fn remove_selected(&mut self) -> usize {
        let ids = self.selection.selected_row_ids(&self.store);
        if ids.is_empty() {
            return 0;
        }
        let revision = self.store.revision();
        let top = ids
            .iter()
            .rev()
            .filter_map(|id| self.store.remove(*id))
            .min()
            .unwrap_or(0);
        self.selection.land_after_removal(&self.store, top);
        self.push_if_changed(revision);
        ids.len()
    }

    pub fn remove_all(&mut self) {
        let revision = self.store.revision();
        self.store.remove_all();
        self.selection.prune(&self.store);
        self.push_if_changed(revision);
    }

    /// Replace every row with `expressions`, skipping blank entries.
    pub fn set_expressions<I, S>(&mut self, expressions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let revision = self.store.revision();
        self.store.set_expressions(expressions);
        self.selection.prune(&self.store);
        self.push_if_changed(revision);
    }

    // ---- selection gestures ----

    pub fn click_row(&mut self, id: RowId) {
        self.selection.select(id);
    }

    pub fn ctrl_click_row(&mut self, id: RowId) {
        self.selection.toggle(id);
    }

    pub fn shift_click_row(&mut self, id: RowId) {
        self.selection.extend_to(&self.store, id);
    }

    /// A click on empty space forgets the current row, so the next add
    /// appends. Multi-row tables also drop their selection.
    pub fn on_click_empty(&mut self) {
        if self.selection.policy() == SelectionPolicy::MultiRow {
            self.selection.clear();
        }
        self.selection.set_current(None);
    }

    /// A double click on empty space appends a new pending row.
    pub fn on_double_click_empty(&mut self) -> RowId {
        self.selection.set_current(None);
        self.add()
    }

    /// The Delete key removes the selection, if any.
    ///
    /// # Returns
    /// `false` when nothing was selected and the key should propagate.
    pub fn on_delete_key(&mut self) -> bool {
        if !self.selection.has_selection() {
            return false;
        }
        self.remove_selected();
        true
    }

    /// Prepare the context menu for a right click on `row`, or on empty space.
    ///
    /// Opening it on empty space clears the selection and the current row.
    pub fn open_context_menu(&mut self, row: Option<RowId>) -> ContextMenuState {
        let on_row = row.is_some_and(|id| self.store.index_of(id).is_some());
        if !on_row {
            self.selection.clear();
            self.selection.set_current(None);
        }
        ContextMenuState {
            copy_value_enabled: on_row,
            add_enabled: true,
            remove_enabled: self.selection.remove_enabled(),
            remove_all_enabled: !self.store.is_empty(),
        }
    }

    /// Take pending selection signals for the host's action wiring.
    pub fn drain_signals(&mut self) -> Vec<SelectionSignal> {
        self.selection.drain_signals()
    }

    // ---- drag and drop ----

    /// Verdict for drag-enter and drag-move.
    pub fn drag_verdict(&self, payload: &DragPayload) -> Option<DropAction> {
        classify_drag(&self.store, &self.selection, payload)
    }

    /// Apply a drop and select what it produced.
    ///
    /// # Returns
    /// `false` when the drop changed nothing (rejected, or a row dropped onto
    /// its own slot); the host should ignore the event.
    pub fn drop_payload(&mut self, payload: &DragPayload, target: DropTarget) -> bool {
        let plan = match resolve_drop(&self.store, &self.selection, payload, target) {
            DropOutcome::Apply(plan) => plan,
            DropOutcome::Cancelled | DropOutcome::Rejected => return false,
        };
        let revision = self.store.revision();
        let action = plan.action;
        let ids = plan.apply_to(&mut self.store);
        match (ids.first(), ids.last()) {
            (Some(first), Some(last)) => {
                self.selection.select(*first);
                self.selection.extend_to(&self.store, *last);
            }
            _ => self.selection.prune(&self.store),
        }
        debug!(?action, rows = ids.len(), "applied drop");
        self.push_if_changed(revision);
        true
    }

    // ---- evaluation ----

    /// Hook for every completed execution step in the evaluator.
    pub fn on_execution_finished(&mut self) {
        self.session.request_refresh(&self.store, false);
    }

    /// Re-push the watch set and evaluate it now.
    pub fn refresh(&mut self) {
        self.session.request_refresh(&self.store, true);
    }

    /// Reconcile a batch delivered outside of [`Self::poll_events`].
    ///
    /// # Errors
    /// Returns [`WatchlistError::Protocol`] when the batch does not match the rows.
    pub fn on_result(&mut self, batch: Option<Vec<WatchEntry>>) -> Result<(), WatchlistError> {
        self.session.on_result(&mut self.store, batch)
    }

    /// Apply every evaluator response received so far.
    ///
    /// # Errors
    /// Propagates [`EvalSession::poll`] protocol violations.
    pub fn poll_events(&mut self) -> Result<usize, WatchlistError> {
        self.session.poll(&mut self.store)
    }

    // ---- presentation ----

    /// Copy the current row's value cell text to `clipboard`.
    ///
    /// # Returns
    /// `false` when there is no current row.
    pub fn copy_current_value(&self, clipboard: &mut dyn Clipboard) -> bool {
        let Some(row) = self.selection.current().and_then(|id| self.store.get(id)) else {
            return false;
        };
        clipboard.set_text(&row.display_text());
        true
    }

    pub fn set_display_font(&mut self, font: TableFont) {
        self.font = font;
    }

    /// Font for the value cell of the row at `index`.
    pub fn value_cell_font(&self, index: usize) -> Option<CellFont> {
        self.store.row_at(index).map(|row| CellFont {
            font: self.font.clone(),
            bold: row.changed,
        })
    }

    fn push_if_changed(&mut self, revision: u64) {
        if self.store.revision() != revision {
            self.session.request_refresh(&self.store, true);
        }
    }
}

#[cfg(test)]
mod tests;
