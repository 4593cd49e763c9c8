//! Patch validator.
//!
//! Checks the structural well-formedness of patches coming from a host tree
//! before they are recorded, so malformed input is rejected at the boundary
//! instead of surfacing later as a replay failure.

use patch_history_pointer::validate_path;

use crate::types::{Patch, PatchOp};

// ── Error ──────────────────────────────────────────────────────────────────

/// Error returned by validation functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ValidationError {}

fn err(msg: &str) -> ValidationError {
    ValidationError(msg.to_string())
}

// ── Public API ─────────────────────────────────────────────────────────────

/// Validate a single patch.
pub fn validate_patch(patch: &Patch) -> Result<(), ValidationError> {
    validate_path(&patch.path).map_err(|_| err("OP_PATH_INVALID"))?;
    match patch.op {
        PatchOp::Add | PatchOp::Replace => {
            if patch.value.is_none() {
                return Err(err("OP_VALUE_MISSING"));
            }
        }
        PatchOp::Remove => {
            if patch.path.is_empty() {
                return Err(err("OP_REMOVE_ROOT"));
            }
        }
    }
    Ok(())
}

/// Validate a list of patches.
///
/// Errors include the index of the failing patch:
/// `"Error in operation [index = N] (reason)."`.
pub fn validate_patches(patches: &[Patch]) -> Result<(), ValidationError> {
    for (i, patch) in patches.iter().enumerate() {
        validate_patch(patch).map_err(|e| {
            ValidationError(format!("Error in operation [index = {}] ({}).", i, e.0))
        })?;
    }
    Ok(())
}
