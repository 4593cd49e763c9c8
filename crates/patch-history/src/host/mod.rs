//! The contract between the engine and the tree it records.
//!
//! A host tree announces every atomic mutation to its listeners as a pair of
//! patch lists, synchronously and before the mutating call returns, and can
//! replay patch lists onto itself.

use std::rc::Rc;

use patch_history_patch::Patch;

use crate::HistoryError;

pub mod json_tree;

pub use json_tree::JsonTree;

/// Why a host tree is emitting patches.
///
/// Hosts pass the mode given to [`HostTree::apply_patches`] through to every
/// notification that replay causes; direct edits use [`ReplayMode::Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayMode {
    /// An application edit. Recorded.
    Record,
    /// The engine replaying history. Never recorded.
    Replay,
}

/// Handle returned by [`HostTree::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Receives the patches of every mutation on a host tree.
pub trait PatchListener {
    /// `forward` redoes the mutation, `inverse` undoes it.
    ///
    /// An error aborts the notification and is returned from the mutating
    /// call.
    fn on_patches(
        &self,
        forward: &[Patch],
        inverse: &[Patch],
        mode: ReplayMode,
    ) -> Result<(), HistoryError>;
}

/// A mutable tree the engine can observe and replay onto.
pub trait HostTree {
    fn subscribe(&mut self, listener: Rc<dyn PatchListener>) -> SubscriptionId;

    /// Returns `false` if `id` was not subscribed.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Apply `patches` in order, notifying listeners with `mode`.
    ///
    /// # Errors
    ///
    /// [`HistoryError::Replay`] naming the first patch that did not apply.
    /// Earlier patches stay applied.
    fn apply_patches(&mut self, patches: &[Patch], mode: ReplayMode) -> Result<(), HistoryError>;
}
