use super::*;
use crate::clipboard::MemoryClipboard;
use watchlist_core::{ProtocolViolation, ValueStyle};

#[test]
fn attach_pushes_and_evaluates_existing_rows() {
    let (cmd_tx, cmd_rx) = unbounded();
    let (_evt_tx, evt_rx) = unbounded::<EvalEvent>();
    let mut table = WatchTable::with_expressions(SelectionPolicy::MultiRow, true, ["a", "b"]);

    table.attach(EvaluatorHandle::from_test_channels(cmd_tx, evt_rx));

    let cmds: Vec<EvalCmd> = cmd_rx.try_iter().collect();
    assert_eq!(
        cmds,
        vec![
            EvalCmd::SetExpressions {
                expressions: vec!["a".to_string(), "b".to_string()],
                debugger_only: true,
            },
            EvalCmd::Evaluate { request_id: 0 },
        ]
    );
}

#[test]
fn execution_step_requests_evaluation_without_push() {
    let mut h = make_table(&["a"]);

    h.table.on_execution_finished();

    let cmds = h.drain_cmds();
    assert_eq!(cmds.len(), 1);
    assert!(matches!(cmds[0], EvalCmd::Evaluate { .. }));
}

#[test]
fn polled_batch_updates_text_style_and_emphasis() {
    let mut h = make_table(&["a", "b"]);
    h.table.on_execution_finished();
    let request_id = last_request_id(&h.drain_cmds());

    h.respond(
        request_id,
        Some(vec![
            WatchEntry::ok("a", "1"),
            WatchEntry::failed("b", "oops", "NameError"),
        ]),
    );
    assert_eq!(h.table.poll_events().expect("poll"), 1);

    let rows = h.table.store().rows();
    assert_eq!(rows[0].display_text(), "1");
    assert_eq!(rows[1].display_text(), "<NameError>");
    assert_eq!(rows[1].tooltip(), "oops");
    assert_eq!(rows[1].style(), ValueStyle::Inert);
    assert!(h.table.value_cell_font(0).expect("cell").bold);

    h.table.on_execution_finished();
    let request_id = last_request_id(&h.drain_cmds());
    h.respond(
        request_id,
        Some(vec![
            WatchEntry::ok("a", "1"),
            WatchEntry::failed("b", "oops", "NameError"),
        ]),
    );
    h.table.poll_events().expect("poll");
    assert!(!h.table.value_cell_font(0).expect("cell").bold);
    assert!(h.table.session().last_evaluated_at().is_some());
}

#[test]
fn restricted_result_clears_values() {
    let mut h = make_table(&["a"]);
    h.table
        .on_result(Some(vec![WatchEntry::ok("a", "1")]))
        .expect("reconcile");

    h.table.on_execution_finished();
    let request_id = last_request_id(&h.drain_cmds());
    h.respond(request_id, None);
    h.table.poll_events().expect("poll");

    assert_eq!(h.expressions(), vec!["a"]);
    assert_eq!(h.table.store().rows()[0].display_text(), "");
}

#[test]
fn batch_for_outdated_rows_is_discarded() {
    let mut h = make_table(&["a"]);
    h.table.on_execution_finished();
    let stale = last_request_id(&h.drain_cmds());

    let id = h.table.add();
    h.table.commit_edit(id, "b").expect("edit");

    h.respond(stale, Some(vec![WatchEntry::ok("a", "1")]));
    assert_eq!(h.table.poll_events().expect("poll"), 0);
    assert!(h
        .table
        .store()
        .rows()
        .iter()
        .all(|row| row.display_text().is_empty()));
}

#[test]
fn mismatched_batch_leaves_rows_untouched() {
    let mut h = make_table(&["a", "b"]);

    let err = h
        .table
        .on_result(Some(vec![WatchEntry::ok("a", "1"), WatchEntry::ok("c", "2")]))
        .expect_err("violation");

    assert!(matches!(
        err,
        WatchlistError::Protocol(ProtocolViolation::ExpressionMismatch { index: 1, .. })
    ));
    assert_eq!(h.table.store().rows()[0].display_text(), "");
}

#[test]
fn pending_rows_are_skipped_during_reconciliation() {
    let mut h = make_table(&["a", "b"]);
    h.table.click_row(h.id_at(1));
    h.table.add();

    h.table
        .on_result(Some(vec![WatchEntry::ok("a", "1"), WatchEntry::ok("b", "2")]))
        .expect("reconcile");

    let texts: Vec<String> = h
        .table
        .store()
        .rows()
        .iter()
        .map(|row| row.display_text())
        .collect();
    assert_eq!(texts, vec!["1", "", "2"]);
}

#[test]
fn copy_value_uses_current_row_cell_text() {
    let mut h = make_table(&["a", "b"]);
    h.table
        .on_result(Some(vec![
            WatchEntry::ok("a", "1"),
            WatchEntry::failed("b", "oops", "SyntaxError"),
        ]))
        .expect("reconcile");
    let mut clipboard = MemoryClipboard::new();

    assert!(!h.table.copy_current_value(&mut clipboard));
    assert_eq!(clipboard.text(), None);

    h.table.click_row(h.id_at(1));
    assert!(h.table.copy_current_value(&mut clipboard));
    assert_eq!(clipboard.text(), Some("<SyntaxError>"));
}

#[test]
fn display_font_applies_to_every_cell() {
    let mut h = make_table(&["a"]);

    h.table.set_display_font(TableFont::new("Fira Code", 12.0));

    let cell = h.table.value_cell_font(0).expect("cell");
    assert_eq!(cell.font, TableFont::new("Fira Code", 12.0));
    assert!(!cell.bold);
    assert!(h.table.value_cell_font(1).is_none());
}
