//! The history controller.
//!
//! # Timeline
//!
//! ```text
//!  state 0 ──C0──▶ state 1 ──C1──▶ state 2 ──C2──▶ ...
//!                              ▲
//!                            cursor
//! ```
//!
//! Checkpoint `Ci` carries the patches between states `i` and `i + 1`.
//! `undo` replays `C(cursor-1).inverse` back to front and steps left; `redo`
//! replays `C(cursor).forward` front to back and steps right. With the cursor
//! on the last checkpoint, that checkpoint is open and collects new edits.
//!
//! # Invariants
//!
//! 1. `0 <= cursor < history_len()`
//! 2. `can_undo() == (cursor > 0)`, `can_redo() == (cursor < history_len() - 1)`
//! 3. A new edit after an undo discards the redo branch first
//! 4. Patches caused by replay are never recorded

use std::rc::Rc;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::checkpoint::Checkpoint;
use crate::config::HistoryConfig;
use crate::host::{HostTree, ReplayMode, SubscriptionId};
use crate::recorder::{Recorder, RecorderState, ReplayGuard};
use crate::HistoryError;

/// One row of a history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub index: usize,
    pub label: Option<String>,
    /// Number of forward patches in the checkpoint.
    pub patch_count: usize,
    /// Whether the cursor is on this checkpoint.
    pub is_current: bool,
}

/// Undo/redo manager for one host tree.
///
/// Created by [`History::attach`], which subscribes a recorder to the tree.
/// Every call that replays patches takes the same tree explicitly.
#[derive(Debug)]
pub struct History {
    state: Rc<RecorderState>,
    subscription: SubscriptionId,
    batch_label: Option<String>,
    config: HistoryConfig,
}

impl History {
    /// Start recording `tree` with an unbounded history.
    pub fn attach<T: HostTree + ?Sized>(tree: &mut T) -> Self {
        Self::with_config(tree, HistoryConfig::default())
    }

    pub fn with_config<T: HostTree + ?Sized>(tree: &mut T, config: HistoryConfig) -> Self {
        let state = Rc::new(RecorderState::default());
        let recorder = Recorder {
            state: Rc::downgrade(&state),
        };
        let subscription = tree.subscribe(Rc::new(recorder));
        debug!(?subscription, ?config, "history attached");
        Self {
            state,
            subscription,
            batch_label: None,
            config,
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    // ── Commit & batches ──────────────────────────────────────────────────

    /// Seal pending edits as one undo step, labelled with `label`.
    ///
    /// Returns `false` (and changes nothing) when there is nothing pending.
    pub fn commit(&mut self, label: Option<&str>) -> bool {
        self.seal(label.map(str::to_owned))
    }

    /// Remember `label` for the next [`end_batch`](Self::end_batch).
    ///
    /// Edits fold into the open checkpoint whether or not a batch is running;
    /// the batch only delays the commit.
    pub fn start_batch(&mut self, label: impl Into<String>) {
        let label = label.into();
        debug!(%label, "batch started");
        self.batch_label = Some(label);
    }

    /// Commit everything since [`start_batch`](Self::start_batch) as one step.
    ///
    /// A no-op outside a batch.
    pub fn end_batch(&mut self) -> bool {
        match self.batch_label.take() {
            Some(label) => self.seal(Some(label)),
            None => false,
        }
    }

    pub fn in_batch(&self) -> bool {
        self.batch_label.is_some()
    }

    fn seal(&mut self, label: Option<String>) -> bool {
        let mut timeline = self.state.timeline.borrow_mut();
        if !timeline.seal(label) {
            return false;
        }
        if let Some(max_depth) = self.config.max_undo_depth {
            let evicted = timeline.enforce_depth(max_depth);
            if evicted > 0 {
                debug!(evicted, max_depth, "evicted oldest checkpoints");
            }
        }
        let sealed = timeline.cursor().checked_sub(1).and_then(|i| timeline.get(i));
        debug!(
            cursor = timeline.cursor(),
            len = timeline.len(),
            label = sealed.and_then(Checkpoint::label),
            "commit"
        );
        true
    }

    /// Revert every uncommitted edit and forget it. Also ends any batch.
    pub fn discard_pending<T: HostTree + ?Sized>(&mut self, tree: &mut T) -> Result<(), HistoryError> {
        let patches = self.state.timeline.borrow().pending_undo_patches();
        if let Some(patches) = patches {
            self.replay(tree, &patches, "discard")?;
            self.state.timeline.borrow_mut().reset_open();
            debug!(reverted = patches.len(), "discarded pending changes");
        }
        self.batch_label = None;
        Ok(())
    }

    // ── Undo / redo / scrub ───────────────────────────────────────────────

    /// Step back one checkpoint.
    ///
    /// Pending edits are sealed first (under the batch label, if a batch is
    /// running), so they are what gets undone. Returns `false` when there is
    /// nothing to undo. On error the cursor does not move.
    pub fn undo<T: HostTree + ?Sized>(&mut self, tree: &mut T) -> Result<bool, HistoryError> {
        if self.has_pending_changes() {
            let label = self.batch_label.take();
            self.seal(label);
        }
        let patches = self.state.timeline.borrow().undo_patches();
        let Some(patches) = patches else {
            return Ok(false);
        };
        self.replay(tree, &patches, "undo")?;
        let mut timeline = self.state.timeline.borrow_mut();
        timeline.step_back();
        debug!(cursor = timeline.cursor(), len = timeline.len(), "undo");
        Ok(true)
    }

    /// Step forward one checkpoint. Returns `false` at the end of history.
    /// On error the cursor does not move.
    pub fn redo<T: HostTree + ?Sized>(&mut self, tree: &mut T) -> Result<bool, HistoryError> {
        let patches = self.state.timeline.borrow().redo_patches();
        let Some(patches) = patches else {
            return Ok(false);
        };
        self.replay(tree, &patches, "redo")?;
        let mut timeline = self.state.timeline.borrow_mut();
        timeline.step_forward();
        debug!(cursor = timeline.cursor(), len = timeline.len(), "redo");
        Ok(true)
    }

    /// Move the cursor to `target` one undo or redo at a time.
    ///
    /// # Errors
    ///
    /// [`HistoryError::InvalidScrubTarget`] if `target >= history_len()`,
    /// before anything moves; otherwise the first failing step's error, with
    /// the cursor left where that step started.
    pub fn scrub_to_index<T: HostTree + ?Sized>(
        &mut self,
        tree: &mut T,
        target: usize,
    ) -> Result<(), HistoryError> {
        let len = self.history_len();
        if target >= len {
            return Err(HistoryError::InvalidScrubTarget { target, len });
        }
        debug!(from = self.current_index(), target, "scrub");
        while self.current_index() != target {
            if target < self.current_index() {
                self.undo(tree)?;
            } else {
                self.redo(tree)?;
            }
        }
        Ok(())
    }

    fn replay<T: HostTree + ?Sized>(
        &self,
        tree: &mut T,
        patches: &[crate::Patch],
        action: &'static str,
    ) -> Result<(), HistoryError> {
        let _guard = ReplayGuard::engage(&self.state.replaying);
        tree.apply_patches(patches, ReplayMode::Replay).map_err(|e| {
            warn!(action, error = %e, "replay failed; history is out of sync with the tree");
            e
        })
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        self.state.timeline.borrow().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.timeline.borrow().can_redo()
    }

    pub fn has_pending_changes(&self) -> bool {
        self.state.timeline.borrow().has_pending()
    }

    pub fn history_len(&self) -> usize {
        self.state.timeline.borrow().len()
    }

    pub fn current_index(&self) -> usize {
        self.state.timeline.borrow().cursor()
    }

    /// A copy of the checkpoint at `index`.
    pub fn checkpoint(&self, index: usize) -> Option<Checkpoint> {
        self.state.timeline.borrow().get(index).cloned()
    }

    /// A copy of the checkpoint under the cursor.
    pub fn current_checkpoint(&self) -> Checkpoint {
        let timeline = self.state.timeline.borrow();
        timeline.get(timeline.cursor()).cloned().unwrap_or_default()
    }

    /// Summaries of every checkpoint, oldest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let timeline = self.state.timeline.borrow();
        timeline
            .checkpoints()
            .iter()
            .enumerate()
            .map(|(index, checkpoint)| HistoryEntry {
                index,
                label: checkpoint.label.clone(),
                patch_count: checkpoint.forward.len(),
                is_current: index == timeline.cursor(),
            })
            .collect()
    }

    /// Dump of the whole timeline, for debugging.
    pub fn to_json(&self) -> Value {
        let timeline = self.state.timeline.borrow();
        json!({
            "cursor": timeline.cursor(),
            "checkpoints": timeline.checkpoints().iter().map(Checkpoint::to_json).collect::<Vec<_>>(),
        })
    }

    /// Stop recording `tree` and drop all checkpoints.
    pub fn dispose<T: HostTree + ?Sized>(self, tree: &mut T) {
        let removed = tree.unsubscribe(self.subscription);
        debug!(subscription = ?self.subscription, removed, "history disposed");
    }
}
