//! Patch recorder: folds host-tree mutations into the open checkpoint.
//!
//! # Coalescing policy
//!
//! Forward list (drives redo):
//! - `replace` overwrites the value of the latest forward patch at the same
//!   path, keeping that patch's position and operation, so fifty writes to
//!   one field leave one patch carrying the last value.
//! - `add` and `remove` are always appended. They address positions in
//!   ordered collections, and two inserts or removals at "index 0" are two
//!   different elements.
//!
//! Inverse list (drives undo, replayed back to front):
//! - `replace` is dropped when an inverse patch for the same path is already
//!   recorded, so the value captured is the one from checkpoint start.
//! - `add` and `remove` are always appended, mirroring the forward rule.
//!
//! A merge only happens when no later patch in the list touches an ancestor
//! or descendant of the path, or shifts a sibling collection the path runs
//! through. Appending is always a correct fallback.

use std::cell::{Cell, RefCell};
use std::rc::Weak;

use patch_history_patch::{validate_patches, Patch, PatchOp};
use patch_history_pointer::{is_child, is_path_equal};
use tracing::trace;

use crate::checkpoint::Checkpoint;
use crate::host::{PatchListener, ReplayMode};
use crate::timeline::Timeline;
use crate::HistoryError;

/// State shared between a [`History`](crate::History) and the listener it
/// registers on the host tree.
#[derive(Debug, Default)]
pub(crate) struct RecorderState {
    pub(crate) timeline: RefCell<Timeline>,
    /// Set for the duration of every replay.
    pub(crate) replaying: Cell<bool>,
}

/// Holds the replay flag for as long as it lives.
pub(crate) struct ReplayGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> ReplayGuard<'a> {
    pub(crate) fn engage(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for ReplayGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// The listener subscribed to the host tree.
///
/// Holds the engine state weakly: once the owning `History` is gone,
/// notifications are ignored.
pub(crate) struct Recorder {
    pub(crate) state: Weak<RecorderState>,
}

impl PatchListener for Recorder {
    fn on_patches(
        &self,
        forward: &[Patch],
        inverse: &[Patch],
        mode: ReplayMode,
    ) -> Result<(), HistoryError> {
        if mode == ReplayMode::Replay {
            return Ok(());
        }
        let Some(state) = self.state.upgrade() else {
            return Ok(());
        };
        if state.replaying.get() {
            trace!("dropping patches emitted during replay");
            return Ok(());
        }
        validate_patches(forward)?;
        validate_patches(inverse)?;

        let mut timeline = state.timeline.borrow_mut();
        timeline.truncate_branch();
        let open = timeline.open_mut();
        fold(open, forward, inverse);
        trace!(
            forward = open.forward.len(),
            inverse = open.inverse.len(),
            "folded patches into open checkpoint"
        );
        Ok(())
    }
}

/// Fold one mutation's patch lists into `checkpoint`.
pub(crate) fn fold(checkpoint: &mut Checkpoint, forward: &[Patch], inverse: &[Patch]) {
    for patch in forward {
        match patch.op {
            PatchOp::Add | PatchOp::Remove => checkpoint.forward.push(patch.clone()),
            PatchOp::Replace => {
                match merge_target(&checkpoint.forward, &patch.path, &[PatchOp::Add, PatchOp::Replace]) {
                    Some(i) => checkpoint.forward[i].value = patch.value.clone(),
                    None => checkpoint.forward.push(patch.clone()),
                }
            }
        }
    }
    for patch in inverse {
        match patch.op {
            PatchOp::Add | PatchOp::Remove => checkpoint.inverse.push(patch.clone()),
            PatchOp::Replace => {
                let seen = merge_target(&checkpoint.inverse, &patch.path, &[PatchOp::Replace, PatchOp::Remove]);
                if seen.is_none() {
                    checkpoint.inverse.push(patch.clone());
                }
            }
        }
    }
}

/// Index of the latest patch at `path` that a write to `path` may merge into.
fn merge_target(list: &[Patch], path: &[String], mergeable: &[PatchOp]) -> Option<usize> {
    for (i, existing) in list.iter().enumerate().rev() {
        if existing.path == path {
            return mergeable.contains(&existing.op).then_some(i);
        }
        if interferes(existing, path) {
            return None;
        }
    }
    None
}

/// Whether `existing` must stay ordered relative to a write at `path`.
fn interferes(existing: &Patch, path: &[String]) -> bool {
    if is_path_equal(&existing.path, path)
        || is_child(&existing.path, path)
        || is_child(path, &existing.path)
    {
        return true;
    }
    match existing.op {
        PatchOp::Replace => false,
        PatchOp::Add | PatchOp::Remove => match existing.path.split_last() {
            Some((_, parent)) => is_path_equal(parent, path) || is_child(parent, path),
            None => true,
        },
    }
}
