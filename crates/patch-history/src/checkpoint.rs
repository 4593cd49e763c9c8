use patch_history_patch::{to_json_patch, Patch};
use serde_json::{json, Value};

/// One undo step: the coalesced forward and inverse patches of every edit
/// made between two commits.
///
/// **Invariant**: replaying `inverse` back to front on the post-edit state
/// restores the state the checkpoint started from; replaying `forward` front
/// to back on that state reproduces the post-edit state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checkpoint {
    pub(crate) forward: Vec<Patch>,
    pub(crate) inverse: Vec<Patch>,
    pub(crate) label: Option<String>,
}

impl Checkpoint {
    /// Patches that redo this step, in application order.
    pub fn forward(&self) -> &[Patch] {
        &self.forward
    }

    /// Patches that undo this step, in recording order (replayed reversed).
    pub fn inverse(&self) -> &[Patch] {
        &self.inverse
    }

    /// The label given when this checkpoint was sealed.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// The inverse list in replay order.
    pub(crate) fn undo_patches(&self) -> Vec<Patch> {
        self.inverse.iter().rev().cloned().collect()
    }

    pub fn to_json(&self) -> Value {
        json!({
            "label": self.label,
            "forward": to_json_patch(&self.forward),
            "inverse": to_json_patch(&self.inverse),
        })
    }
}
