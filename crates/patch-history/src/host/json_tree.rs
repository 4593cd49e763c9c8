//! A [`HostTree`] over a `serde_json::Value` document.

use std::fmt;
use std::rc::Rc;

use patch_history_patch::{
    apply_patch, invert, validate_patch, Applied, ApplyError, Patch, PatchOp, Path,
};
use serde_json::Value;

use super::{HostTree, PatchListener, ReplayMode, SubscriptionId};
use crate::HistoryError;

/// A JSON document that reports each edit as a forward/inverse patch pair.
///
/// ```
/// use patch_history::{History, JsonTree};
/// use serde_json::json;
///
/// let mut tree = JsonTree::new(json!({"card": {"x": 0}}));
/// let mut history = History::attach(&mut tree);
///
/// tree.set(vec!["card".into(), "x".into()], json!(40)).unwrap();
/// history.commit(Some("move card"));
///
/// history.undo(&mut tree).unwrap();
/// assert_eq!(tree.value(), &json!({"card": {"x": 0}}));
/// ```
pub struct JsonTree {
    doc: Value,
    listeners: Vec<(SubscriptionId, Rc<dyn PatchListener>)>,
    next_id: u64,
}

impl fmt::Debug for JsonTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonTree")
            .field("doc", &self.doc)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl JsonTree {
    pub fn new(doc: Value) -> Self {
        Self {
            doc,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn value(&self) -> &Value {
        &self.doc
    }

    pub fn into_value(self) -> Value {
        self.doc
    }

    pub fn get(&self, path: &[String]) -> Option<&Value> {
        patch_history_pointer::get(&self.doc, path)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Swap in a whole new document without notifying anyone, e.g. after
    /// reloading from disk. Recorded history may no longer apply.
    pub fn reset(&mut self, doc: Value) {
        self.doc = doc;
    }

    /// Write `value` at `path`: `replace` if something is there, `add` if
    /// the slot is new (an absent object key, or one past the end of an
    /// array).
    pub fn set(&mut self, path: Path, value: Value) -> Result<(), HistoryError> {
        let op = if self.get(&path).is_some() {
            PatchOp::Replace
        } else {
            PatchOp::Add
        };
        self.edit(Patch { op, path, value: Some(value) })?;
        Ok(())
    }

    /// Insert `value` at `path`, shifting later array elements right.
    pub fn insert(&mut self, path: Path, value: Value) -> Result<(), HistoryError> {
        self.edit(Patch::add(path, value))?;
        Ok(())
    }

    /// Append `value` to the array at `array_path`.
    pub fn push(&mut self, mut array_path: Path, value: Value) -> Result<(), HistoryError> {
        array_path.push("-".to_string());
        self.insert(array_path, value)
    }

    /// Remove and return the value at `path`.
    pub fn remove(&mut self, path: Path) -> Result<Value, HistoryError> {
        let applied = self.edit(Patch::remove(path))?;
        Ok(applied.displaced.unwrap_or(Value::Null))
    }

    fn edit(&mut self, patch: Patch) -> Result<Applied, HistoryError> {
        // Rejected edits must leave the document untouched.
        validate_patch(&patch)?;
        let applied = apply_patch(&mut self.doc, &patch).map_err(|source| HistoryError::Edit {
            pointer: patch.pointer(),
            source,
        })?;
        self.announce(patch, &applied, ReplayMode::Record)?;
        Ok(applied)
    }

    fn announce(&self, patch: Patch, applied: &Applied, mode: ReplayMode) -> Result<(), HistoryError> {
        let inverse = invert(&patch, applied);
        let forward = Patch {
            path: applied.path.clone(),
            ..patch
        };
        for (_, listener) in &self.listeners {
            listener.on_patches(std::slice::from_ref(&forward), std::slice::from_ref(&inverse), mode)?;
        }
        Ok(())
    }
}

impl HostTree for JsonTree {
    fn subscribe(&mut self, listener: Rc<dyn PatchListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn apply_patches(&mut self, patches: &[Patch], mode: ReplayMode) -> Result<(), HistoryError> {
        for (index, patch) in patches.iter().enumerate() {
            let applied = apply_patch(&mut self.doc, patch).map_err(|source| ApplyError {
                index,
                op: patch.op.as_str(),
                pointer: patch.pointer(),
                source,
            })?;
            self.announce(patch.clone(), &applied, mode)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Log {
        seen: RefCell<Vec<(Vec<Patch>, Vec<Patch>, ReplayMode)>>,
    }

    impl PatchListener for Log {
        fn on_patches(&self, forward: &[Patch], inverse: &[Patch], mode: ReplayMode) -> Result<(), HistoryError> {
            self.seen.borrow_mut().push((forward.to_vec(), inverse.to_vec(), mode));
            Ok(())
        }
    }

    fn p(pointer: &str) -> Path {
        patch_history_pointer::parse_json_pointer(pointer)
    }

    #[test]
    fn test_set_emits_replace_or_add() {
        let log = Rc::new(Log::default());
        let mut tree = JsonTree::new(json!({"a": 1}));
        tree.subscribe(log.clone());
        tree.set(p("/a"), json!(2)).unwrap();
        tree.set(p("/b"), json!(3)).unwrap();

        let seen = log.seen.borrow();
        assert_eq!(seen[0].0, vec![Patch::replace(p("/a"), json!(2))]);
        assert_eq!(seen[0].1, vec![Patch::replace(p("/a"), json!(1))]);
        assert_eq!(seen[1].0, vec![Patch::add(p("/b"), json!(3))]);
        assert_eq!(seen[1].1, vec![Patch::remove(p("/b"))]);
        assert_eq!(seen[1].2, ReplayMode::Record);
    }

    #[test]
    fn test_push_resolves_index() {
        let log = Rc::new(Log::default());
        let mut tree = JsonTree::new(json!({"cards": ["a"]}));
        tree.subscribe(log.clone());
        tree.push(p("/cards"), json!("b")).unwrap();
        assert_eq!(tree.value(), &json!({"cards": ["a", "b"]}));
        let seen = log.seen.borrow();
        assert_eq!(seen[0].0, vec![Patch::add(p("/cards/1"), json!("b"))]);
        assert_eq!(seen[0].1, vec![Patch::remove(p("/cards/1"))]);
    }

    #[test]
    fn test_remove_returns_value() {
        let mut tree = JsonTree::new(json!({"cards": [{"id": 1}]}));
        assert_eq!(tree.remove(p("/cards/0")).unwrap(), json!({"id": 1}));
        assert_eq!(tree.value(), &json!({"cards": []}));
    }

    #[test]
    fn test_failed_edit_notifies_nobody() {
        let log = Rc::new(Log::default());
        let mut tree = JsonTree::new(json!({}));
        tree.subscribe(log.clone());
        let err = tree.remove(p("/missing")).unwrap_err();
        assert!(matches!(err, HistoryError::Edit { .. }));
        assert!(log.seen.borrow().is_empty());
    }

    #[test]
    fn test_too_deep_edit_leaves_document_untouched() {
        let log = Rc::new(Log::default());
        let mut deep = json!(1);
        for _ in 0..300 {
            deep = json!({"n": deep});
        }
        let initial = deep.clone();
        let mut tree = JsonTree::new(deep);
        tree.subscribe(log.clone());

        let path: Path = std::iter::repeat("n".to_string()).take(300).collect();
        let err = tree.set(path, json!(2)).unwrap_err();
        assert!(matches!(err, HistoryError::MalformedPatch(_)));
        assert_eq!(tree.value(), &initial);
        assert!(log.seen.borrow().is_empty());
    }

    #[test]
    fn test_apply_patches_forwards_mode() {
        let log = Rc::new(Log::default());
        let mut tree = JsonTree::new(json!({"a": 1}));
        tree.subscribe(log.clone());
        tree.apply_patches(&[Patch::replace(p("/a"), json!(5))], ReplayMode::Replay)
            .unwrap();
        assert_eq!(log.seen.borrow()[0].2, ReplayMode::Replay);
    }

    #[test]
    fn test_apply_patches_reports_index() {
        let mut tree = JsonTree::new(json!({"a": 1}));
        let err = tree
            .apply_patches(
                &[Patch::replace(p("/a"), json!(2)), Patch::remove(p("/b"))],
                ReplayMode::Record,
            )
            .unwrap_err();
        match err {
            HistoryError::Replay(e) => {
                assert_eq!(e.index, 1);
                assert_eq!(e.pointer, "/b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unsubscribe() {
        let log = Rc::new(Log::default());
        let mut tree = JsonTree::new(json!({"a": 1}));
        let id = tree.subscribe(log.clone());
        assert!(tree.unsubscribe(id));
        assert!(!tree.unsubscribe(id));
        tree.set(p("/a"), json!(2)).unwrap();
        assert!(log.seen.borrow().is_empty());
    }
}
