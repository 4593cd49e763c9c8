//! Property tests: random edit sequences always replay to the exact states
//! they were committed from.

use patch_history::{History, JsonTree};
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// Strategy helpers
// ============================================================================

#[derive(Debug, Clone)]
enum Edit {
    SetField(u8, i64),
    Push(i64),
    Insert(usize, i64),
    RemoveAt(usize),
    SetItem(usize, i64),
    AddKey(u8),
    DropKey(u8),
    Commit,
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => (0u8..3, any::<i64>()).prop_map(|(f, v)| Edit::SetField(f, v)),
        2 => any::<i64>().prop_map(Edit::Push),
        2 => (0usize..6, any::<i64>()).prop_map(|(i, v)| Edit::Insert(i, v)),
        2 => (0usize..6).prop_map(Edit::RemoveAt),
        2 => (0usize..6, any::<i64>()).prop_map(|(i, v)| Edit::SetItem(i, v)),
        1 => (0u8..3).prop_map(Edit::AddKey),
        1 => (0u8..3).prop_map(Edit::DropKey),
        2 => Just(Edit::Commit),
    ]
}

fn initial() -> Value {
    json!({"f0": 0, "f1": 0, "f2": 0, "items": [1, 2, 3], "extra": {}})
}

fn path(steps: &[&str]) -> Vec<String> {
    steps.iter().map(|s| s.to_string()).collect()
}

/// Apply one edit; edits that do not fit the current document are skipped.
fn apply(tree: &mut JsonTree, edit: &Edit) {
    let len = tree.value()["items"].as_array().map_or(0, Vec::len);
    let result = match edit {
        Edit::SetField(f, v) => tree.set(path(&[&format!("f{f}")]), json!(v)),
        Edit::Push(v) => tree.push(path(&["items"]), json!(v)),
        Edit::Insert(i, v) if *i <= len => tree.insert(path(&["items", &i.to_string()]), json!(v)),
        Edit::RemoveAt(i) if *i < len => tree.remove(path(&["items", &i.to_string()])).map(|_| ()),
        Edit::SetItem(i, v) if *i < len => tree.set(path(&["items", &i.to_string()]), json!(v)),
        Edit::AddKey(k) => tree.insert(path(&["extra", &format!("k{k}")]), json!(k)),
        Edit::DropKey(k) if tree.value()["extra"].get(format!("k{k}")).is_some() => {
            tree.remove(path(&["extra", &format!("k{k}")])).map(|_| ())
        }
        _ => Ok(()),
    };
    result.expect("edit within bounds");
}

/// Run `edits`, committing where asked and once at the end. Returns the
/// document at each history index.
fn record(tree: &mut JsonTree, history: &mut History, edits: &[Edit]) -> Vec<Value> {
    let mut states = vec![tree.value().clone()];
    for edit in edits {
        match edit {
            Edit::Commit => {
                if history.commit(None) {
                    states.push(tree.value().clone());
                }
            }
            other => apply(tree, other),
        }
    }
    if history.commit(None) {
        states.push(tree.value().clone());
    }
    states
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn scrub_reaches_every_committed_state(
        edits in prop::collection::vec(edit_strategy(), 1..60),
        targets in prop::collection::vec(any::<prop::sample::Index>(), 1..10),
    ) {
        let mut tree = JsonTree::new(initial());
        let mut history = History::attach(&mut tree);
        let states = record(&mut tree, &mut history, &edits);
        prop_assert_eq!(history.history_len(), states.len());

        for target in targets {
            let index = target.index(states.len());
            history.scrub_to_index(&mut tree, index).unwrap();
            prop_assert_eq!(history.current_index(), index);
            prop_assert_eq!(tree.value(), &states[index]);
            prop_assert!(!history.has_pending_changes());
        }
    }

    #[test]
    fn undo_then_redo_is_identity(
        edits in prop::collection::vec(edit_strategy(), 1..40),
    ) {
        let mut tree = JsonTree::new(initial());
        let mut history = History::attach(&mut tree);
        record(&mut tree, &mut history, &edits);

        let before = tree.value().clone();
        if history.undo(&mut tree).unwrap() {
            prop_assert!(history.redo(&mut tree).unwrap());
        }
        prop_assert_eq!(tree.value(), &before);
    }

    #[test]
    fn discard_restores_last_commit(
        committed in prop::collection::vec(edit_strategy(), 0..20),
        pending in prop::collection::vec(edit_strategy(), 1..20),
    ) {
        let mut tree = JsonTree::new(initial());
        let mut history = History::attach(&mut tree);
        record(&mut tree, &mut history, &committed);
        let snapshot = tree.value().clone();
        let len = history.history_len();

        for edit in pending.iter().filter(|e| !matches!(e, Edit::Commit)) {
            apply(&mut tree, edit);
        }
        history.discard_pending(&mut tree).unwrap();
        prop_assert_eq!(tree.value(), &snapshot);
        prop_assert!(!history.commit(None));
        prop_assert_eq!(history.history_len(), len);
    }
}
