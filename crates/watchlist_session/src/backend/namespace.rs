//! Evaluation namespaces the evaluator worker runs expressions against.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use watchlist_core::{EvalFailure, EvalOutcome};

/// A live namespace that can evaluate watch expressions.
///
/// Implementations own the expression language; the watch table never
/// interprets expression text.
pub trait Namespace: Send + 'static {
    /// Whether execution is currently paused in a debugger.
    fn is_debugging(&self) -> bool;

    /// Evaluate one expression. Failures are values, not panics.
    fn evaluate(&mut self, expression: &str) -> EvalOutcome;
}

/// Flat name-to-value namespace.
///
/// Each expression must be a bare identifier that is looked up verbatim.
/// Clones share the same bindings, so a host can keep one clone and mutate
/// bindings between execution steps while the worker owns another.
#[derive(Debug, Clone, Default)]
pub struct MapNamespace {
    bindings: Arc<RwLock<BTreeMap<String, String>>>,
    debugging: Arc<AtomicBool>,
}

fn is_identifier(expression: &str) -> bool {
    let mut chars = expression.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl MapNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to the already stringified `value`.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        let mut bindings = self
            .bindings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        bindings.insert(name.into(), value.into());
    }

    pub fn unset(&self, name: &str) {
        let mut bindings = self
            .bindings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        bindings.remove(name);
    }

    pub fn set_debugging(&self, debugging: bool) {
        self.debugging.store(debugging, Ordering::SeqCst);
    }
}

impl Namespace for MapNamespace {
    fn is_debugging(&self) -> bool {
        self.debugging.load(Ordering::SeqCst)
    }

    fn evaluate(&mut self, expression: &str) -> EvalOutcome {
        if !is_identifier(expression) {
            return Err(EvalFailure::new("SyntaxError", "invalid syntax"));
        }
        let bindings = self
            .bindings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        bindings.get(expression).cloned().ok_or_else(|| {
            EvalFailure::new(
                "NameError",
                format!("name '{}' is not defined", expression),
            )
        })
    }
}
