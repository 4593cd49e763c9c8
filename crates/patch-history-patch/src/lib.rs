//! Path-addressed tree patches.
//!
//! A [`Patch`] is one atomic mutation of a `serde_json::Value` tree: an
//! `add`, `remove` or `replace` at a [`Path`]. The shapes follow RFC 6902,
//! restricted to the three structural operations.
//!
//! Every applied patch reports what it displaced ([`Applied`]); [`invert`]
//! turns that into the patch which undoes it.
//!
//! ```
//! use patch_history_patch::{apply_patch, invert, Patch};
//! use serde_json::json;
//!
//! let mut doc = json!({"title": "draft"});
//! let forward = Patch::replace(vec!["title".into()], json!("final"));
//! let applied = apply_patch(&mut doc, &forward).unwrap();
//! let inverse = invert(&forward, &applied);
//! assert_eq!(doc, json!({"title": "final"}));
//!
//! apply_patch(&mut doc, &inverse).unwrap();
//! assert_eq!(doc, json!({"title": "draft"}));
//! ```

pub mod apply;
pub mod codec;
pub mod types;
pub mod validate;

pub use apply::{apply_patch, apply_patches, invert, Applied, ApplyError};
pub use codec::json::{from_json, from_json_patch, to_json, to_json_patch};
pub use types::{Patch, PatchError, PatchOp, Path};
pub use validate::{validate_patch, validate_patches, ValidationError};
