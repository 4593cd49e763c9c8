use patch_history_patch::{ApplyError, PatchError, ValidationError};
use thiserror::Error;

/// Errors surfaced by the history engine and its host trees.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// `scrub_to_index` was given an index outside the timeline. Nothing moved.
    #[error("scrub target {target} is outside history of length {len}")]
    InvalidScrubTarget { target: usize, len: usize },

    /// The host tree emitted a patch the recorder cannot fold.
    #[error("malformed patch from host tree: {0}")]
    MalformedPatch(#[from] ValidationError),

    /// A recorded patch no longer applies to the host tree. The tree may be
    /// partially mutated; history should be treated as unusable.
    #[error("replay failed: {0}")]
    Replay(#[from] ApplyError),

    /// A direct edit on a host tree was rejected.
    #[error("edit at {pointer:?} failed: {source}")]
    Edit {
        pointer: String,
        #[source]
        source: PatchError,
    },

    #[error("invalid history config: {0}")]
    Config(#[from] toml::de::Error),
}
