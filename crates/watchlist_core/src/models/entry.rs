//! Evaluator wire entries and per-expression outcomes.

use crate::text::truncate_value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a single expression could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalFailure {
    /// Human-readable failure message, shown as the cell tooltip.
    pub message: String,
    /// Failure class name such as `NameError`.
    pub kind: String,
}

impl EvalFailure {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for EvalFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Result of evaluating one watch expression.
pub type EvalOutcome = Result<String, EvalFailure>;

/// One `(expression, result-or-message, error-kind)` tuple of an evaluation batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEntry {
    pub expression: String,
    /// Stringified result, or the failure message when `error_kind` is set.
    pub value: String,
    pub error_kind: Option<String>,
}

impl WatchEntry {
    /// Build a successful entry, capping the value at the display limit.
    pub fn ok(expression: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            value: truncate_value(value.into()),
            error_kind: None,
        }
    }

    /// Build a failed entry carrying the failure message and class name.
    pub fn failed(
        expression: impl Into<String>,
        message: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            expression: expression.into(),
            value: message.into(),
            error_kind: Some(kind.into()),
        }
    }

    /// Convert a per-expression outcome into its wire entry.
    pub fn from_outcome(expression: impl Into<String>, outcome: EvalOutcome) -> Self {
        match outcome {
            Ok(value) => Self::ok(expression, value),
            Err(failure) => Self::failed(expression, failure.message, failure.kind),
        }
    }

    /// View this entry as a per-expression outcome.
    pub fn outcome(&self) -> EvalOutcome {
        match &self.error_kind {
            None => Ok(self.value.clone()),
            Some(kind) => Err(EvalFailure::new(kind.clone(), self.value.clone())),
        }
    }
}

impl<E, V> From<(E, V, Option<&str>)> for WatchEntry
where
    E: Into<String>,
    V: Into<String>,
{
    fn from((expression, value, error_kind): (E, V, Option<&str>)) -> Self {
        Self {
            expression: expression.into(),
            value: value.into(),
            error_kind: error_kind.map(str::to_string),
        }
    }
}
