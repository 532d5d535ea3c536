//! Watch table rows and their derived rendering state.

use crate::constants::{NAME_ERROR_KINDS, SYNTAX_ERROR_KINDS};
use crate::models::entry::WatchEntry;
use crate::text::truncate_value;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable row identity, independent of the row's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(Uuid);

impl RowId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual category of a value cell, derived from its error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueStyle {
    /// Successful evaluation (or no value yet).
    #[default]
    Normal,
    /// The expression refers to a name that does not exist right now.
    /// The cell is de-emphasized but stays selectable for copying.
    Inert,
    /// The expression can never evaluate as written.
    Invalid,
    /// Any other evaluation failure.
    Attention,
}

impl ValueStyle {
    /// Classify an error kind.
    pub fn classify(error_kind: Option<&str>) -> Self {
        match error_kind {
            None => Self::Normal,
            Some(kind) if NAME_ERROR_KINDS.contains(&kind) => Self::Inert,
            Some(kind) if SYNTAX_ERROR_KINDS.contains(&kind) => Self::Invalid,
            Some(_) => Self::Attention,
        }
    }
}

/// One watch expression and its most recent evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: RowId,
    /// Trimmed expression text; empty while the row is still being typed.
    pub expression: String,
    /// Evaluation result, or the failure message when `error_kind` is set.
    pub value: String,
    pub error_kind: Option<String>,
    /// Whether the last reconciliation changed the displayed text.
    pub changed: bool,
}

impl Row {
    pub(crate) fn new(expression: Option<String>) -> Self {
        Self {
            id: RowId::new(),
            expression: expression.unwrap_or_default(),
            value: String::new(),
            error_kind: None,
            changed: false,
        }
    }

    /// Returns `true` for a freshly added row whose expression is not entered yet.
    pub fn is_pending(&self) -> bool {
        self.expression.is_empty()
    }

    /// Text shown in the value cell: the result, or `<ErrorKind>` on failure.
    pub fn display_text(&self) -> String {
        match &self.error_kind {
            Some(kind) => format!("<{}>", kind),
            None => self.value.clone(),
        }
    }

    /// Tooltip for the value cell: the failure message, empty on success.
    pub fn tooltip(&self) -> &str {
        if self.error_kind.is_some() {
            &self.value
        } else {
            ""
        }
    }

    pub fn style(&self) -> ValueStyle {
        ValueStyle::classify(self.error_kind.as_deref())
    }

    /// Forget the displayed value; the expression is kept.
    pub fn clear_value(&mut self) {
        self.value.clear();
        self.error_kind = None;
        self.changed = false;
    }

    /// Apply one evaluation entry, recording whether the visible text changed.
    ///
    /// The caller is responsible for checking that `entry` belongs to this row.
    pub fn apply_entry(&mut self, entry: WatchEntry) {
        let previous = self.display_text();
        self.value = match entry.error_kind {
            None => truncate_value(entry.value),
            Some(_) => entry.value,
        };
        self.error_kind = entry.error_kind;
        self.changed = self.display_text() != previous;
    }
}
