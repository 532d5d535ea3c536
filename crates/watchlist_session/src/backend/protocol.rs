//! Protocol types exchanged with an evaluator connection.

use serde::{Deserialize, Serialize};
use watchlist_core::WatchEntry;

/// Correlates an evaluate request with its response.
pub type RequestId = u64;

/// Commands sent by the watch table to its evaluator, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvalCmd {
    /// Replace the stored watch set and the restricted-mode flag.
    SetExpressions {
        expressions: Vec<String>,
        debugger_only: bool,
    },
    /// Evaluate the stored watch set now.
    Evaluate { request_id: RequestId },
}

/// Responses produced by the evaluator and polled by the watch table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvalEvent {
    /// Evaluation finished. `batch` is `None` when restricted mode is on and
    /// the namespace is not paused in a debugger.
    Evaluated {
        request_id: RequestId,
        batch: Option<Vec<WatchEntry>>,
    },
    /// Evaluation was abandoned because a new watch set was pushed.
    Interrupted { request_id: RequestId },
}

impl EvalEvent {
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::Evaluated { request_id, .. } | Self::Interrupted { request_id } => *request_id,
        }
    }
}
