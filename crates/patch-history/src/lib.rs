//! Reversible-edit history for path-addressed trees.
//!
//! A [`History`] subscribes to a [`HostTree`], folds the forward/inverse
//! patches of every edit into an open [`Checkpoint`], and seals checkpoints
//! into undo steps on [`commit`](History::commit). [`undo`](History::undo),
//! [`redo`](History::redo) and [`scrub_to_index`](History::scrub_to_index)
//! replay those patches onto the tree without recording them again.
//!
//! ```
//! use patch_history::{History, JsonTree};
//! use serde_json::json;
//!
//! let mut tree = JsonTree::new(json!({"cards": []}));
//! let mut history = History::attach(&mut tree);
//!
//! history.start_batch("add card");
//! tree.push(vec!["cards".into()], json!({"x": 0})).unwrap();
//! for x in 1..=10 {
//!     tree.set(vec!["cards".into(), "0".into(), "x".into()], json!(x)).unwrap();
//! }
//! history.end_batch();
//! assert_eq!(history.history_len(), 2);
//!
//! history.undo(&mut tree).unwrap();
//! assert_eq!(tree.value(), &json!({"cards": []}));
//! history.redo(&mut tree).unwrap();
//! assert_eq!(tree.value(), &json!({"cards": [{"x": 10}]}));
//! ```
//!
//! The engine is single-threaded: shared state lives in `Rc`/`RefCell` and
//! nothing here is `Send`.

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod history;
pub mod host;
mod recorder;
mod timeline;

pub use checkpoint::Checkpoint;
pub use config::HistoryConfig;
pub use error::HistoryError;
pub use history::{History, HistoryEntry};
pub use host::{HostTree, JsonTree, PatchListener, ReplayMode, SubscriptionId};
pub use patch_history_patch::{Patch, PatchOp, Path};
