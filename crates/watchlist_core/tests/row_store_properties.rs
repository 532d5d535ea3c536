//! Property-based invariant tests for `RowStore`.
//!
//! 1. Insert/remove/reorder replay matches a plain `Vec` reference model
//! 2. Row ids stay unique through any operation sequence
//! 3. Bulk replace followed by snapshot drops only blank entries

use proptest::prelude::*;
use std::collections::HashSet;
use watchlist_core::{RowId, RowStore};

#[derive(Debug, Clone)]
enum Op {
    Insert { at: usize },
    Remove { index: usize },
    Reorder { from: usize, to: usize },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..12).prop_map(|at| Op::Insert { at }),
        (0usize..12).prop_map(|index| Op::Remove { index }),
        (0usize..12, 0usize..12).prop_map(|(from, to)| Op::Reorder { from, to }),
    ]
}

fn apply_to_reference(reference: &mut Vec<String>, op: &Op, label: String) {
    match *op {
        Op::Insert { at } => {
            let at = at.min(reference.len());
            reference.insert(at, label);
        }
        Op::Remove { index } => {
            if index < reference.len() {
                reference.remove(index);
            }
        }
        Op::Reorder { from, to } => {
            if from < reference.len() {
                let to = to.min(reference.len() - 1);
                let item = reference.remove(from);
                reference.insert(to, item);
            }
        }
    }
}

fn apply_to_store(store: &mut RowStore, op: &Op, label: &str) {
    match *op {
        Op::Insert { at } => {
            store.insert(at, Some(label));
        }
        Op::Remove { index } => {
            if let Some(id) = store.row_at(index).map(|row| row.id) {
                store.remove(id);
            }
        }
        Op::Reorder { from, to } => {
            store.reorder(from, to);
        }
    }
}

proptest! {
    #[test]
    fn replay_matches_reference_model(ops in proptest::collection::vec(arb_op(), 0..64)) {
        let mut store = RowStore::new();
        let mut reference: Vec<String> = Vec::new();

        for (n, op) in ops.iter().enumerate() {
            let label = format!("e{}", n);
            apply_to_store(&mut store, op, &label);
            apply_to_reference(&mut reference, op, label);
            prop_assert_eq!(store.snapshot_expressions(), reference.clone());
        }
    }
}

proptest! {
    #[test]
    fn row_ids_stay_unique(ops in proptest::collection::vec(arb_op(), 0..64)) {
        let mut store = RowStore::new();
        for (n, op) in ops.iter().enumerate() {
            apply_to_store(&mut store, op, &format!("e{}", n));
            let ids: HashSet<RowId> = store.rows().iter().map(|row| row.id).collect();
            prop_assert_eq!(ids.len(), store.len());
        }
    }
}

proptest! {
    #[test]
    fn bulk_replace_round_trips(
        entries in proptest::collection::vec(
            prop_oneof![Just(String::new()), Just("  ".to_string()), "[a-z]{1,6}"],
            0..20,
        )
    ) {
        let mut store = RowStore::new();
        store.set_expressions(&entries);
        let expected: Vec<String> = entries
            .iter()
            .filter(|entry| !entry.trim().is_empty())
            .cloned()
            .collect();
        prop_assert_eq!(store.snapshot_expressions(), expected);
    }
}
