//! Request/response cycle between one watch table and its evaluator.

use crate::backend::{EvalCmd, EvalEvent, EvaluatorHandle, RequestId};
use chrono::{DateTime, Utc};
use crossbeam_channel::TryRecvError;
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};
use watchlist_core::{RowStore, WatchEntry, WatchlistError, DEFAULT_DEBUGGER_ONLY};

/// Evaluation session for one table.
///
/// Every evaluate request is tagged with the store revision it was issued
/// against. Responses for a revision older than the store's current one are
/// discarded, because the rows they describe may no longer exist.
pub struct EvalSession {
    connection: Option<EvaluatorHandle>,
    debugger_only: bool,
    next_request_id: RequestId,
    /// Store revision last pushed to the evaluator; `None` forces the next push.
    pushed_revision: Option<u64>,
    in_flight: BTreeMap<RequestId, u64>,
    last_evaluated_at: Option<DateTime<Utc>>,
}

impl Default for EvalSession {
    fn default() -> Self {
        Self::new(DEFAULT_DEBUGGER_ONLY)
    }
}

impl EvalSession {
    pub fn new(debugger_only: bool) -> Self {
        Self {
            connection: None,
            debugger_only,
            next_request_id: 0,
            pushed_revision: None,
            in_flight: BTreeMap::new(),
            last_evaluated_at: None,
        }
    }

    /// Bind this session to an evaluator connection, replacing any previous one.
    pub fn attach(&mut self, handle: EvaluatorHandle) {
        if self.connection.is_some() {
            info!("replacing evaluator connection");
        } else {
            info!("evaluator connection attached");
        }
        self.connection = Some(handle);
        self.pushed_revision = None;
        self.in_flight.clear();
    }

    /// Drop the evaluator connection; later refreshes are no-ops.
    pub fn detach(&mut self) -> Option<EvaluatorHandle> {
        self.pushed_revision = None;
        self.in_flight.clear();
        self.connection.take()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn debugger_only(&self) -> bool {
        self.debugger_only
    }

    /// Change restricted mode; the new flag is sent with the next refresh.
    ///
    /// Responses to requests issued under the old mode are discarded.
    pub fn set_debugger_only(&mut self, debugger_only: bool) {
        if self.debugger_only != debugger_only {
            self.debugger_only = debugger_only;
            self.pushed_revision = None;
            self.in_flight.clear();
        }
    }

    /// When the last batch was reconciled onto the table.
    pub fn last_evaluated_at(&self) -> Option<DateTime<Utc>> {
        self.last_evaluated_at
    }

    /// Number of evaluate requests still awaiting a response.
    pub fn pending_requests(&self) -> usize {
        self.in_flight.len()
    }

    /// Ask the evaluator to re-evaluate the watch set.
    ///
    /// With `push`, any in-flight evaluation is interrupted and the current
    /// expression snapshot replaces the evaluator's stored set first. A push
    /// also happens without `push` when the store changed since the last one,
    /// or after (re)attaching. Without a connection this does nothing.
    ///
    /// # Returns
    /// The id of the evaluate request, or `None` when nothing was sent.
    pub fn request_refresh(&mut self, store: &RowStore, push: bool) -> Option<RequestId> {
        let revision = store.revision();
        let push = push || self.pushed_revision != Some(revision);
        let handle = self.connection.as_ref()?;

        if push {
            handle.interrupt();
            let cmd = EvalCmd::SetExpressions {
                expressions: store.snapshot_expressions(),
                debugger_only: self.debugger_only,
            };
            if handle.cmd_tx.send(cmd).is_err() {
                self.drop_connection();
                return None;
            }
            self.pushed_revision = Some(revision);
        }

        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);
        let handle = self.connection.as_ref()?;
        if handle.cmd_tx.send(EvalCmd::Evaluate { request_id }).is_err() {
            self.drop_connection();
            return None;
        }
        self.in_flight.insert(request_id, revision);
        debug!(request_id, revision, push, "requested evaluation");
        Some(request_id)
    }

    /// Reconcile an evaluation result onto `store`.
    ///
    /// `None` (restricted mode outside a debugger) clears every displayed
    /// value and keeps the expressions.
    ///
    /// # Errors
    /// Returns [`WatchlistError::Protocol`] when the batch does not line up
    /// with the evaluable rows. Nothing is applied in that case.
    pub fn on_result(
        &mut self,
        store: &mut RowStore,
        batch: Option<Vec<WatchEntry>>,
    ) -> Result<(), WatchlistError> {
        let Some(batch) = batch else {
            store.clear_values();
            return Ok(());
        };
        if let Err(violation) = store.apply_batch(batch) {
            error!("evaluator protocol violation: {}", violation);
            return Err(violation.into());
        }
        self.last_evaluated_at = Some(Utc::now());
        Ok(())
    }

    /// Drain and reconcile every response received so far.
    ///
    /// # Returns
    /// The number of results applied to `store`.
    ///
    /// # Errors
    /// Stops at the first protocol violation; later responses stay queued.
    pub fn poll(&mut self, store: &mut RowStore) -> Result<usize, WatchlistError> {
        let mut applied = 0;
        loop {
            let Some(handle) = self.connection.as_ref() else {
                return Ok(applied);
            };
            let event = match handle.evt_rx.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => return Ok(applied),
                Err(TryRecvError::Disconnected) => {
                    self.drop_connection();
                    return Ok(applied);
                }
            };
            let request_id = event.request_id();
            let issued_at = self.in_flight.remove(&request_id);
            match event {
                EvalEvent::Interrupted { .. } => {
                    debug!(request_id, "evaluation interrupted by a newer push");
                }
                EvalEvent::Evaluated { batch, .. } => {
                    if issued_at != Some(store.revision()) {
                        warn!(
                            request_id,
                            current = store.revision(),
                            "discarding stale evaluation result"
                        );
                        continue;
                    }
                    self.on_result(store, batch)?;
                    applied += 1;
                }
            }
        }
    }

    fn drop_connection(&mut self) {
        if self.connection.take().is_some() {
            info!("evaluator disconnected; refreshes disabled");
        }
        self.pushed_revision = None;
        self.in_flight.clear();
    }
}

impl std::fmt::Debug for EvalSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalSession")
            .field("connected", &self.is_connected())
            .field("debugger_only", &self.debugger_only)
            .field("pushed_revision", &self.pushed_revision)
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}
