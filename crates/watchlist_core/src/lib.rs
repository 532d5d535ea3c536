//! Core domain library for the watchlist (row model, reordering, selection, settings).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across watchlist crates.
pub mod constants;
/// Error types for the table model and evaluator protocol.
pub mod error;
/// Row and evaluator wire models.
pub mod models;
/// Drag/drop decision logic.
pub mod reorder;
/// Selection tracking and remove-action availability.
pub mod selection;
/// Persisted expression settings.
pub mod settings;
/// Ordered row storage.
pub mod store;
/// Expression and value text normalization helpers.
pub mod text;

pub use config::Config;
pub use constants::*;
pub use error::{ProtocolViolation, WatchlistError};
pub use models::entry::{EvalFailure, EvalOutcome, WatchEntry};
pub use models::row::{Row, RowId, ValueStyle};
pub use selection::{SelectionCoordinator, SelectionPolicy, SelectionSignal};
pub use store::{all_expressions_across_sessions, ExpressionEdit, RowStore};
