//! Ordered storage for watch table rows.
//!
//! Row order is the watch order sent to the evaluator. Every mutation that can
//! change [`RowStore::snapshot_expressions`] bumps [`RowStore::revision`], which
//! the evaluator session uses to recognize responses computed for an older
//! expression list.

use crate::error::{ProtocolViolation, WatchlistError};
use crate::models::entry::WatchEntry;
use crate::models::row::{Row, RowId};
use crate::text::normalize_expression;
use std::collections::BTreeSet;

/// Outcome of editing a row's expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionEdit {
    /// The expression changed and the old value was discarded.
    Updated,
    /// The trimmed text equals the current expression; nothing changed.
    Unchanged,
    /// The trimmed text was empty, so the row at `index` was removed.
    Removed { index: usize },
}

/// Authoritative ordered list of watch rows.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    rows: Vec<Row>,
    revision: u64,
}

impl RowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated from persisted expressions.
    pub fn with_expressions<I, S>(expressions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        store.set_expressions(expressions);
        store
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_at(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn index_of(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    /// Counter bumped whenever the evaluable expression list may have changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Insert a row at `at` (clamped to `[0, len]`).
    ///
    /// A missing or blank `expression` creates a pending row that waits for
    /// the user to type it.
    ///
    /// # Returns
    /// The id of the new row.
    pub fn insert(&mut self, at: usize, expression: Option<&str>) -> RowId {
        let expression = expression.and_then(normalize_expression);
        let evaluable = expression.is_some();
        let row = Row::new(expression);
        let id = row.id;
        let at = at.min(self.rows.len());
        self.rows.insert(at, row);
        if evaluable {
            self.bump_revision();
        }
        id
    }

    /// Insert several expressions so that they appear in the given order
    /// starting at `at`.
    ///
    /// Each one is inserted at the same index in reverse order, so the
    /// first expression ends up on top. Blank expressions are skipped.
    pub fn insert_many(&mut self, at: usize, expressions: &[String]) -> Vec<RowId> {
        let at = at.min(self.rows.len());
        let mut ids: Vec<RowId> = expressions
            .iter()
            .rev()
            .filter(|expression| !expression.trim().is_empty())
            .map(|expression| self.insert(at, Some(expression.as_str())))
            .collect();
        ids.reverse();
        ids
    }

    /// Remove one row.
    ///
    /// # Returns
    /// The index the row occupied, or `None` when the id is unknown.
    pub fn remove(&mut self, id: RowId) -> Option<usize> {
        let index = self.index_of(id)?;
        let row = self.rows.remove(index);
        if !row.is_pending() {
            self.bump_revision();
        }
        Some(index)
    }

    pub fn remove_all(&mut self) {
        if self.rows.iter().any(|row| !row.is_pending()) {
            self.bump_revision();
        }
        self.rows.clear();
    }

    /// Replace a row's expression with trimmed `text`.
    ///
    /// An empty result removes the row. A real change discards the old value
    /// so it is never shown against the new expression.
    ///
    /// # Errors
    /// Returns [`WatchlistError::UnknownRow`] when `id` is not in the store.
    pub fn set_expression(
        &mut self,
        id: RowId,
        text: &str,
    ) -> Result<ExpressionEdit, WatchlistError> {
        let index = self.index_of(id).ok_or(WatchlistError::UnknownRow(id))?;
        let Some(expression) = normalize_expression(text) else {
            self.remove(id);
            return Ok(ExpressionEdit::Removed { index });
        };

        let row = &mut self.rows[index];
        if row.expression == expression {
            return Ok(ExpressionEdit::Unchanged);
        }
        row.expression = expression;
        row.clear_value();
        self.bump_revision();
        Ok(ExpressionEdit::Updated)
    }

    /// Move the row at `from` so that it ends up at index `to`.
    ///
    /// `to` is clamped to the last index.
    ///
    /// # Returns
    /// `false` when `from` is out of range or the move would not change the order.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.rows.len() {
            return false;
        }
        let to = to.min(self.rows.len() - 1);
        if from == to {
            return false;
        }
        let row = self.rows.remove(from);
        self.rows.insert(to, row);
        self.bump_revision();
        true
    }

    /// Move a row, identified by id, to final index `to`.
    pub fn move_row(&mut self, id: RowId, to: usize) -> bool {
        match self.index_of(id) {
            Some(from) => self.reorder(from, to),
            None => false,
        }
    }

    /// Current non-empty expressions in table order.
    pub fn snapshot_expressions(&self) -> Vec<String> {
        self.evaluable_rows().map(|row| row.expression.clone()).collect()
    }

    /// Replace every row with the given expressions, skipping blank entries.
    pub fn set_expressions<I, S>(&mut self, expressions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.remove_all();
        for expression in expressions {
            let at = self.rows.len();
            if normalize_expression(expression.as_ref()).is_some() {
                self.insert(at, Some(expression.as_ref()));
            }
        }
    }

    /// Rows that take part in evaluation, in table order.
    pub fn evaluable_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| !row.is_pending())
    }

    fn evaluable_rows_mut(&mut self) -> impl Iterator<Item = &mut Row> {
        self.rows.iter_mut().filter(|row| !row.is_pending())
    }

    /// Reconcile an evaluation batch onto the evaluable rows.
    ///
    /// The batch must have one entry per evaluable row, in order, each naming
    /// that row's expression. Nothing is applied unless the whole batch lines up.
    ///
    /// # Errors
    /// Returns a [`ProtocolViolation`] on a length or expression mismatch.
    pub fn apply_batch(&mut self, batch: Vec<WatchEntry>) -> Result<(), ProtocolViolation> {
        let expected = self.evaluable_rows().count();
        if batch.len() != expected {
            return Err(ProtocolViolation::LengthMismatch {
                expected,
                received: batch.len(),
            });
        }
        let mismatch = self
            .evaluable_rows()
            .zip(&batch)
            .enumerate()
            .find(|(_, (row, entry))| row.expression != entry.expression);
        if let Some((index, (row, entry))) = mismatch {
            return Err(ProtocolViolation::ExpressionMismatch {
                index,
                expected: row.expression.clone(),
                received: entry.expression.clone(),
            });
        }
        for (row, entry) in self.evaluable_rows_mut().zip(batch) {
            row.apply_entry(entry);
        }
        Ok(())
    }

    /// Forget all displayed values; expressions are kept.
    pub fn clear_values(&mut self) {
        for row in &mut self.rows {
            row.clear_value();
        }
    }
}

/// Union of the expressions of every store, de-duplicated and sorted.
///
/// Used to persist one shared expression list across concurrently open sessions.
pub fn all_expressions_across_sessions<'a>(
    stores: impl IntoIterator<Item = &'a RowStore>,
) -> Vec<String> {
    stores
        .into_iter()
        .flat_map(RowStore::snapshot_expressions)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
