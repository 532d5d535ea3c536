//! Drag/drop decision logic for the watch table.
//!
//! Host adapters translate toolkit gestures into a [`DragPayload`] and a
//! [`DropTarget`]; [`resolve_drop`] turns those into a [`DropPlan`] without
//! touching the store. The caller applies the plan with [`DropPlan::apply_to`].

use crate::models::row::RowId;
use crate::selection::SelectionCoordinator;
use crate::store::RowStore;
use crate::text::split_expression_lines;

/// What a drop does to its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAction {
    /// New rows are created; the drag source keeps its content.
    Copy,
    /// An existing row changes position.
    Move,
}

/// Where the drop indicator sits relative to the hovered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIndicator {
    AboveItem,
    BelowItem,
    OnItem,
    OnViewport,
}

/// Drop position as reported by the host view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    /// Row under the pointer, `None` for empty space below the rows.
    pub hovered_row: Option<usize>,
    pub indicator: DropIndicator,
}

impl DropTarget {
    pub fn above(row: usize) -> Self {
        Self {
            hovered_row: Some(row),
            indicator: DropIndicator::AboveItem,
        }
    }

    pub fn below(row: usize) -> Self {
        Self {
            hovered_row: Some(row),
            indicator: DropIndicator::BelowItem,
        }
    }

    /// Empty space at the bottom of the table.
    pub fn empty_space() -> Self {
        Self {
            hovered_row: None,
            indicator: DropIndicator::OnViewport,
        }
    }

    /// Gap index (`0..=row_count`) the pointer designates.
    pub fn insert_index(&self, row_count: usize) -> usize {
        match self.hovered_row {
            None => row_count,
            Some(row) if self.indicator == DropIndicator::BelowItem => (row + 1).min(row_count),
            Some(row) => row.min(row_count),
        }
    }
}

/// Where dragged rows come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOrigin {
    ThisTable,
    OtherWidget,
}

/// Content carried by a drag, reduced to the shapes the table understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPayload {
    /// Plain text; one expression per non-blank line.
    Text(String),
    /// Table rows; which rows is given by the source table's selection.
    Rows { origin: DragOrigin },
    /// Anything else (files, images, unknown mime types).
    Unsupported,
}

/// Content a plan inserts or moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPayload {
    Expressions(Vec<String>),
    Row(RowId),
}

/// Descriptor of a drop the caller should apply as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropPlan {
    pub action: DropAction,
    /// For [`DropAction::Copy`], the index of the first new row. For
    /// [`DropAction::Move`], the moved row's final index.
    pub target_index: usize,
    pub payload: DropPayload,
}

/// Decision for one drop gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Apply(DropPlan),
    /// A supported gesture that would not change anything.
    Cancelled,
    /// An unsupported gesture; the host ignores the event.
    Rejected,
}

fn single_selected_row(store: &RowStore, selection: &SelectionCoordinator) -> Option<usize> {
    match selection.selected_spans(store).as_slice() {
        [span] if span.row_count() == 1 => Some(span.top),
        _ => None,
    }
}

/// Verdict for drag-enter and drag-move events.
///
/// # Returns
/// The action the drop would perform, or `None` when the drag must be ignored.
pub fn classify_drag(
    store: &RowStore,
    selection: &SelectionCoordinator,
    payload: &DragPayload,
) -> Option<DropAction> {
    match payload {
        DragPayload::Text(_) => Some(DropAction::Copy),
        DragPayload::Rows {
            origin: DragOrigin::ThisTable,
        } if single_selected_row(store, selection).is_some() => Some(DropAction::Move),
        _ => None,
    }
}

/// Plan moving `row` into the gap at `insert_at` (`0..=len`).
///
/// The gap index is shifted back by one when the row sits above it, because
/// taking the row out closes its old slot first.
pub fn plan_row_move(store: &RowStore, row: RowId, insert_at: usize) -> DropOutcome {
    let Some(source) = store.index_of(row) else {
        return DropOutcome::Rejected;
    };
    let mut target = insert_at.min(store.len());
    if source < target {
        target -= 1;
    }
    if target == source {
        return DropOutcome::Cancelled;
    }
    DropOutcome::Apply(DropPlan {
        action: DropAction::Move,
        target_index: target,
        payload: DropPayload::Row(row),
    })
}

/// Turn a drop gesture into a plan.
pub fn resolve_drop(
    store: &RowStore,
    selection: &SelectionCoordinator,
    payload: &DragPayload,
    target: DropTarget,
) -> DropOutcome {
    let insert_at = target.insert_index(store.len());
    match classify_drag(store, selection, payload) {
        Some(DropAction::Copy) => {
            let DragPayload::Text(text) = payload else {
                return DropOutcome::Rejected;
            };
            let expressions = split_expression_lines(text);
            if expressions.is_empty() {
                return DropOutcome::Cancelled;
            }
            DropOutcome::Apply(DropPlan {
                action: DropAction::Copy,
                target_index: insert_at,
                payload: DropPayload::Expressions(expressions),
            })
        }
        Some(DropAction::Move) => match single_selected_row(store, selection)
            .and_then(|index| store.row_at(index))
        {
            Some(row) => plan_row_move(store, row.id, insert_at),
            None => DropOutcome::Rejected,
        },
        None => DropOutcome::Rejected,
    }
}

impl DropPlan {
    /// Apply this plan to `store`.
    ///
    /// # Returns
    /// Ids of the inserted rows, or the moved row's id.
    pub fn apply_to(self, store: &mut RowStore) -> Vec<RowId> {
        match self.payload {
            DropPayload::Expressions(expressions) => {
                store.insert_many(self.target_index, &expressions)
            }
            DropPayload::Row(id) => {
                if store.move_row(id, self.target_index) {
                    vec![id]
                } else {
                    Vec::new()
                }
            }
        }
    }
}
