use patch_history_patch::Patch;

use crate::checkpoint::Checkpoint;

/// The ordered checkpoints plus the cursor.
///
/// Checkpoint `i` holds the transition from state `i` to state `i + 1`.
#[derive(Debug, Clone)]
pub(crate) struct Timeline {
    /// **Invariant**: never empty.
    checkpoints: Vec<Checkpoint>,
    /// **Invariant**: `cursor < checkpoints.len()`. When the cursor is on the
    /// last checkpoint, that checkpoint is the open one.
    cursor: usize,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            checkpoints: vec![Checkpoint::default()],
            cursor: 0,
        }
    }
}

impl Timeline {
    pub(crate) fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub(crate) fn can_redo(&self) -> bool {
        self.cursor < self.checkpoints.len() - 1
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self.can_redo() && !self.checkpoints[self.cursor].is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Checkpoint> {
        self.checkpoints.get(index)
    }

    pub(crate) fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    /// Drop the redo branch so a fresh edit starts from an empty open
    /// checkpoint. The checkpoint at the cursor holds the undone step and
    /// goes with the branch.
    pub(crate) fn truncate_branch(&mut self) {
        if self.can_redo() {
            self.checkpoints.truncate(self.cursor + 1);
            self.checkpoints[self.cursor] = Checkpoint::default();
        }
    }

    pub(crate) fn open_mut(&mut self) -> &mut Checkpoint {
        &mut self.checkpoints[self.cursor]
    }

    /// Seal the open checkpoint and open a new one. Returns `false` when
    /// there was nothing to seal.
    pub(crate) fn seal(&mut self, label: Option<String>) -> bool {
        if !self.has_pending() {
            return false;
        }
        self.cursor += 1;
        self.checkpoints.truncate(self.cursor);
        self.checkpoints.push(Checkpoint::default());
        if label.is_some() {
            self.checkpoints[self.cursor - 1].label = label;
        }
        true
    }

    /// Inverse patches of the open checkpoint, in replay order.
    pub(crate) fn pending_undo_patches(&self) -> Option<Vec<Patch>> {
        self.has_pending()
            .then(|| self.checkpoints[self.cursor].undo_patches())
    }

    pub(crate) fn reset_open(&mut self) {
        if !self.can_redo() {
            self.checkpoints[self.cursor] = Checkpoint::default();
        }
    }

    /// Patches that take the tree from state `cursor` to `cursor - 1`.
    pub(crate) fn undo_patches(&self) -> Option<Vec<Patch>> {
        self.can_undo()
            .then(|| self.checkpoints[self.cursor - 1].undo_patches())
    }

    /// Patches that take the tree from state `cursor` to `cursor + 1`.
    pub(crate) fn redo_patches(&self) -> Option<Vec<Patch>> {
        self.can_redo()
            .then(|| self.checkpoints[self.cursor].forward.clone())
    }

    pub(crate) fn step_back(&mut self) {
        debug_assert!(self.can_undo());
        self.cursor -= 1;
    }

    pub(crate) fn step_forward(&mut self) {
        debug_assert!(self.can_redo());
        self.cursor += 1;
    }

    /// Evict the oldest sealed checkpoints so at most `max_depth` remain
    /// behind the cursor. Returns how many were dropped.
    pub(crate) fn enforce_depth(&mut self, max_depth: usize) -> usize {
        let excess = self.cursor.saturating_sub(max_depth);
        if excess > 0 {
            self.checkpoints.drain(..excess);
            self.cursor -= excess;
        }
        excess
    }
}
