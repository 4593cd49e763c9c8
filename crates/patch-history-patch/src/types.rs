//! Core types for patches.

use serde_json::Value;
use thiserror::Error;

pub use patch_history_pointer::Path;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error("NOT_FOUND")]
    NotFound,
    #[error("INVALID_INDEX")]
    InvalidIndex,
    #[error("INVALID_TARGET")]
    InvalidTarget,
    #[error("MISSING_VALUE")]
    MissingValue,
    #[error("INVALID_OP: {0}")]
    InvalidOp(String),
}

// ── Operation kind ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

impl PatchOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOp::Add => "add",
            PatchOp::Remove => "remove",
            PatchOp::Replace => "replace",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, PatchError> {
        match s {
            "add" => Ok(PatchOp::Add),
            "remove" => Ok(PatchOp::Remove),
            "replace" => Ok(PatchOp::Replace),
            other => Err(PatchError::InvalidOp(format!("unknown op: {other}"))),
        }
    }
}

// ── Patch ─────────────────────────────────────────────────────────────────

/// One addressable tree mutation.
///
/// `value` is present for `Add` and `Replace` and absent for `Remove`.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub op: PatchOp,
    pub path: Path,
    pub value: Option<Value>,
}

impl Patch {
    pub fn add(path: Path, value: Value) -> Self {
        Self { op: PatchOp::Add, path, value: Some(value) }
    }

    pub fn remove(path: Path) -> Self {
        Self { op: PatchOp::Remove, path, value: None }
    }

    pub fn replace(path: Path, value: Value) -> Self {
        Self { op: PatchOp::Replace, path, value: Some(value) }
    }

    /// JSON Pointer rendering of the path, for diagnostics.
    pub fn pointer(&self) -> String {
        patch_history_pointer::format_json_pointer(&self.path)
    }

    /// The payload, or [`PatchError::MissingValue`] when an `Add` or
    /// `Replace` arrives without one.
    pub(crate) fn required_value(&self) -> Result<&Value, PatchError> {
        self.value.as_ref().ok_or(PatchError::MissingValue)
    }
}
