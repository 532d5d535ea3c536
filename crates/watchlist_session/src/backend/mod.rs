//! Evaluator wiring for the watch table.
//!
//! This module exposes the command/event protocol, the namespace seam, and the
//! worker spawn helper that stands in for one evaluator connection.

mod namespace;
mod protocol;
mod worker;

pub use namespace::{MapNamespace, Namespace};
pub use protocol::{EvalCmd, EvalEvent, RequestId};
pub use worker::{spawn_evaluator, EvaluatorHandle, WatchState};

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use watchlist_core::WatchEntry;

    fn recv_event(rx: &crossbeam_channel::Receiver<EvalEvent>) -> EvalEvent {
        rx.recv_timeout(Duration::from_secs(2))
            .expect("expected evaluator event")
    }

    fn push(handle: &EvaluatorHandle, expressions: &[&str], debugger_only: bool) {
        handle
            .cmd_tx
            .send(EvalCmd::SetExpressions {
                expressions: expressions.iter().map(|e| e.to_string()).collect(),
                debugger_only,
            })
            .expect("send push");
    }

    #[test]
    fn evaluator_evaluates_pushed_set_in_order() {
        let namespace = MapNamespace::new();
        namespace.set("a", "1");
        namespace.set("b", "[1, 2]");
        let evaluator = spawn_evaluator(namespace);

        push(&evaluator, &["b", "a"], false);
        evaluator
            .cmd_tx
            .send(EvalCmd::Evaluate { request_id: 1 })
            .expect("send evaluate");

        match recv_event(&evaluator.evt_rx) {
            EvalEvent::Evaluated {
                request_id: 1,
                batch: Some(batch),
            } => {
                assert_eq!(
                    batch,
                    vec![WatchEntry::ok("b", "[1, 2]"), WatchEntry::ok("a", "1")]
                );
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn evaluator_reports_restricted_mode_as_missing_batch() {
        let namespace = MapNamespace::new();
        namespace.set("a", "1");
        let evaluator = spawn_evaluator(namespace.clone());

        push(&evaluator, &["a"], true);
        evaluator
            .cmd_tx
            .send(EvalCmd::Evaluate { request_id: 4 })
            .expect("send evaluate");
        assert_eq!(
            recv_event(&evaluator.evt_rx),
            EvalEvent::Evaluated {
                request_id: 4,
                batch: None,
            }
        );

        namespace.set_debugging(true);
        evaluator
            .cmd_tx
            .send(EvalCmd::Evaluate { request_id: 5 })
            .expect("send evaluate");
        match recv_event(&evaluator.evt_rx) {
            EvalEvent::Evaluated {
                request_id: 5,
                batch: Some(batch),
            } => assert_eq!(batch.len(), 1),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn evaluator_sees_namespace_changes_between_requests() {
        let namespace = MapNamespace::new();
        namespace.set("x", "1");
        let evaluator = spawn_evaluator(namespace.clone());
        push(&evaluator, &["x"], false);

        for (request_id, expected) in [(1, "1"), (2, "2")] {
            namespace.set("x", expected);
            evaluator
                .cmd_tx
                .send(EvalCmd::Evaluate { request_id })
                .expect("send evaluate");
            match recv_event(&evaluator.evt_rx) {
                EvalEvent::Evaluated {
                    batch: Some(batch), ..
                } => assert_eq!(batch[0].value, expected),
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }

    #[test]
    fn evaluator_exits_when_handle_is_dropped() {
        let evaluator = spawn_evaluator(MapNamespace::new());
        let evt_rx = evaluator.evt_rx.clone();
        drop(evaluator);

        match evt_rx.recv_timeout(Duration::from_secs(2)) {
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
