//! State-level table tests driven through fake evaluator channels.

use super::*;
use crate::backend::{EvalCmd, EvalEvent};
use crossbeam_channel::{unbounded, Receiver, Sender};

mod evaluation;

struct TestHarness {
    table: WatchTable,
    cmd_rx: Receiver<EvalCmd>,
    evt_tx: Sender<EvalEvent>,
}

fn make_table(expressions: &[&str]) -> TestHarness {
    make_table_with_policy(expressions, SelectionPolicy::MultiRow)
}

fn make_table_with_policy(expressions: &[&str], policy: SelectionPolicy) -> TestHarness {
    let (cmd_tx, cmd_rx) = unbounded();
    let (evt_tx, evt_rx) = unbounded();
    let mut table = WatchTable::with_expressions(policy, false, expressions.iter().copied());
    table.attach(EvaluatorHandle::from_test_channels(cmd_tx, evt_rx));
    let harness = TestHarness {
        table,
        cmd_rx,
        evt_tx,
    };
    harness.drain_cmds();
    harness
}

impl TestHarness {
    fn drain_cmds(&self) -> Vec<EvalCmd> {
        self.cmd_rx.try_iter().collect()
    }

    /// Expression lists pushed since the last drain.
    fn pushed(&self) -> Vec<Vec<String>> {
        self.drain_cmds()
            .into_iter()
            .filter_map(|cmd| match cmd {
                EvalCmd::SetExpressions { expressions, .. } => Some(expressions),
                EvalCmd::Evaluate { .. } => None,
            })
            .collect()
    }

    fn id_at(&self, index: usize) -> RowId {
        self.table.store().rows()[index].id
    }

    fn expressions(&self) -> Vec<String> {
        self.table.expressions()
    }

    fn selected_indices(&self) -> Vec<usize> {
        self.table
            .selection()
            .selected_row_ids(self.table.store())
            .into_iter()
            .filter_map(|id| self.table.store().index_of(id))
            .collect()
    }

    /// Answer the last evaluate request with `batch`.
    fn respond(&self, request_id: u64, batch: Option<Vec<WatchEntry>>) {
        self.evt_tx
            .send(EvalEvent::Evaluated { request_id, batch })
            .expect("send event");
    }
}

fn last_request_id(cmds: &[EvalCmd]) -> u64 {
    cmds.iter()
        .rev()
        .find_map(|cmd| match cmd {
            EvalCmd::Evaluate { request_id } => Some(*request_id),
            EvalCmd::SetExpressions { .. } => None,
        })
        .expect("evaluate request")
}
