//! Evaluator worker thread owning one connection's watch state.

use crate::backend::{EvalCmd, EvalEvent, Namespace, RequestId};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};
use watchlist_core::{WatchEntry, DEFAULT_DEBUGGER_ONLY};

/// Handle for sending commands to, and receiving events from, one evaluator.
pub struct EvaluatorHandle {
    pub cmd_tx: Sender<EvalCmd>,
    pub evt_rx: Receiver<EvalEvent>,
    interrupt: Arc<AtomicBool>,
}

impl EvaluatorHandle {
    /// Build a handle around caller-owned channels, with no worker attached.
    pub fn from_test_channels(cmd_tx: Sender<EvalCmd>, evt_rx: Receiver<EvalEvent>) -> Self {
        Self {
            cmd_tx,
            evt_rx,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Ask the worker to abandon any evaluation in progress.
    ///
    /// The request stays armed until the worker processes the next
    /// [`EvalCmd::SetExpressions`], so evaluations queued before that push are
    /// abandoned as well.
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::SeqCst);
    }

    pub fn interrupt_requested(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }
}

/// Watch set stored on the evaluator side of one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchState {
    pub expressions: Vec<String>,
    /// Evaluate only while the namespace is paused in a debugger.
    pub debugger_only: bool,
}

impl Default for WatchState {
    fn default() -> Self {
        Self {
            expressions: Vec::new(),
            debugger_only: DEFAULT_DEBUGGER_ONLY,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Evaluation {
    Restricted,
    Done(Vec<WatchEntry>),
    Interrupted,
}

pub(crate) struct WorkerState<N> {
    namespace: N,
    watch: WatchState,
    interrupt: Arc<AtomicBool>,
    evt_tx: Sender<EvalEvent>,
}

impl<N: Namespace> WorkerState<N> {
    fn new(namespace: N, interrupt: Arc<AtomicBool>, evt_tx: Sender<EvalEvent>) -> Self {
        Self {
            namespace,
            watch: WatchState::default(),
            interrupt,
            evt_tx,
        }
    }

    fn evaluate(&mut self) -> Evaluation {
        if self.watch.debugger_only && !self.namespace.is_debugging() {
            return Evaluation::Restricted;
        }
        let mut entries = Vec::with_capacity(self.watch.expressions.len());
        for expression in &self.watch.expressions {
            if self.interrupt.load(Ordering::SeqCst) {
                return Evaluation::Interrupted;
            }
            let outcome = self.namespace.evaluate(expression);
            entries.push(WatchEntry::from_outcome(expression.clone(), outcome));
        }
        Evaluation::Done(entries)
    }

    fn handle_evaluate(&mut self, request_id: RequestId) {
        let event = match self.evaluate() {
            Evaluation::Restricted => {
                debug!(request_id, "evaluation skipped outside the debugger");
                EvalEvent::Evaluated {
                    request_id,
                    batch: None,
                }
            }
            Evaluation::Done(entries) => {
                debug!(request_id, entries = entries.len(), "evaluated watch set");
                EvalEvent::Evaluated {
                    request_id,
                    batch: Some(entries),
                }
            }
            Evaluation::Interrupted => {
                debug!(request_id, "evaluation interrupted");
                EvalEvent::Interrupted { request_id }
            }
        };
        let _ = self.evt_tx.send(event);
    }

    pub(crate) fn handle(&mut self, cmd: EvalCmd) {
        match cmd {
            EvalCmd::SetExpressions {
                expressions,
                debugger_only,
            } => {
                self.interrupt.store(false, Ordering::SeqCst);
                debug!(
                    expressions = expressions.len(),
                    debugger_only, "stored watch set"
                );
                self.watch = WatchState {
                    expressions,
                    debugger_only,
                };
            }
            EvalCmd::Evaluate { request_id } => self.handle_evaluate(request_id),
        }
    }
}

/// Spawn the evaluator worker thread for one connection.
///
/// Commands are processed strictly in arrival order, so a push followed by an
/// evaluate request is always evaluated against the pushed set.
///
/// # Returns
/// An [`EvaluatorHandle`] containing the command sender and event receiver.
///
/// # Panics
/// Panics if the worker thread cannot be spawned.
pub fn spawn_evaluator<N: Namespace>(namespace: N) -> EvaluatorHandle {
    let (cmd_tx, cmd_rx) = unbounded();
    let (evt_tx, evt_rx) = unbounded();
    let interrupt = Arc::new(AtomicBool::new(false));
    let worker_interrupt = Arc::clone(&interrupt);

    thread::Builder::new()
        .name("watchlist-evaluator".to_string())
        .spawn(move || {
            let mut state = WorkerState::new(namespace, worker_interrupt, evt_tx);
            for cmd in cmd_rx.iter() {
                state.handle(cmd);
            }
            info!("evaluator connection closed");
        })
        .expect("spawn evaluator thread");

    EvaluatorHandle {
        cmd_tx,
        evt_rx,
        interrupt,
    }
}
