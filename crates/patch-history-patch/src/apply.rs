//! Patch application and inversion.

use patch_history_pointer::{format_json_pointer, get_mut, is_valid_index};
use serde_json::Value;
use thiserror::Error;

use super::types::{Patch, PatchError, PatchOp, Path};

// ── Result types ──────────────────────────────────────────────────────────

/// Outcome of applying a single patch.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    /// The path actually written, with `-` resolved to a concrete index.
    pub path: Path,
    /// The value the patch overwrote or removed, if any.
    pub displaced: Option<Value>,
}

/// A patch list failed part-way through.
///
/// Patches before `index` have already been applied; nothing is rolled back.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("patch {index} ({op} {pointer}) failed: {source}")]
pub struct ApplyError {
    pub index: usize,
    pub op: &'static str,
    pub pointer: String,
    #[source]
    pub source: PatchError,
}

// ── Path navigation ───────────────────────────────────────────────────────

fn parent_mut<'a>(doc: &'a mut Value, parent_path: &[String]) -> Result<&'a mut Value, PatchError> {
    get_mut(doc, parent_path).ok_or(PatchError::NotFound)
}

fn parse_index(key: &str) -> Result<usize, PatchError> {
    if !is_valid_index(key) {
        return Err(PatchError::InvalidIndex);
    }
    key.parse().map_err(|_| PatchError::InvalidIndex)
}

fn with_last(parent_path: &[String], key: String) -> Path {
    let mut path = parent_path.to_vec();
    path.push(key);
    path
}

// ── Individual operation applicators ─────────────────────────────────────

fn apply_add(doc: &mut Value, path: &[String], value: Value) -> Result<Applied, PatchError> {
    let Some((key, parent_path)) = path.split_last() else {
        let old = std::mem::replace(doc, value);
        return Ok(Applied { path: Vec::new(), displaced: Some(old) });
    };
    match parent_mut(doc, parent_path)? {
        Value::Object(map) => {
            let old = map.insert(key.clone(), value);
            Ok(Applied { path: path.to_vec(), displaced: old })
        }
        Value::Array(arr) => {
            let idx = if key == "-" { arr.len() } else { parse_index(key)? };
            if idx > arr.len() {
                return Err(PatchError::InvalidIndex);
            }
            arr.insert(idx, value);
            Ok(Applied { path: with_last(parent_path, idx.to_string()), displaced: None })
        }
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_remove(doc: &mut Value, path: &[String]) -> Result<Applied, PatchError> {
    let Some((key, parent_path)) = path.split_last() else {
        return Err(PatchError::InvalidTarget);
    };
    let removed = match parent_mut(doc, parent_path)? {
        Value::Object(map) => map.shift_remove(key).ok_or(PatchError::NotFound)?,
        Value::Array(arr) => {
            let idx = parse_index(key)?;
            if idx >= arr.len() {
                return Err(PatchError::NotFound);
            }
            arr.remove(idx)
        }
        _ => return Err(PatchError::InvalidTarget),
    };
    Ok(Applied { path: path.to_vec(), displaced: Some(removed) })
}

fn apply_replace(doc: &mut Value, path: &[String], value: Value) -> Result<Applied, PatchError> {
    let Some((key, parent_path)) = path.split_last() else {
        let old = std::mem::replace(doc, value);
        return Ok(Applied { path: Vec::new(), displaced: Some(old) });
    };
    let slot = match parent_mut(doc, parent_path)? {
        Value::Object(map) => map.get_mut(key).ok_or(PatchError::NotFound)?,
        Value::Array(arr) => {
            let idx = parse_index(key)?;
            arr.get_mut(idx).ok_or(PatchError::NotFound)?
        }
        _ => return Err(PatchError::InvalidTarget),
    };
    let old = std::mem::replace(slot, value);
    Ok(Applied { path: path.to_vec(), displaced: Some(old) })
}

// ── Public API ────────────────────────────────────────────────────────────

/// Apply one patch to `doc` in place.
///
/// # Errors
///
/// - [`PatchError::NotFound`] if the parent (or, for `remove`/`replace`, the
///   target) does not exist
/// - [`PatchError::InvalidIndex`] for a malformed or out-of-range array index
/// - [`PatchError::InvalidTarget`] when the parent is a scalar, or on
///   `remove` of the root
/// - [`PatchError::MissingValue`] for `add`/`replace` without a value
pub fn apply_patch(doc: &mut Value, patch: &Patch) -> Result<Applied, PatchError> {
    match patch.op {
        PatchOp::Add => apply_add(doc, &patch.path, patch.required_value()?.clone()),
        PatchOp::Remove => apply_remove(doc, &patch.path),
        PatchOp::Replace => apply_replace(doc, &patch.path, patch.required_value()?.clone()),
    }
}

/// Apply a patch list in order, stopping at the first failure.
pub fn apply_patches(doc: &mut Value, patches: &[Patch]) -> Result<Vec<Applied>, ApplyError> {
    let mut results = Vec::with_capacity(patches.len());
    for (index, patch) in patches.iter().enumerate() {
        let applied = apply_patch(doc, patch).map_err(|source| ApplyError {
            index,
            op: patch.op.as_str(),
            pointer: format_json_pointer(&patch.path),
            source,
        })?;
        results.push(applied);
    }
    Ok(results)
}

/// Build the patch that reverses `patch`, given what applying it displaced.
///
/// An `add` into a fresh slot inverts to `remove`; an `add` that overwrote an
/// object key (or the root) inverts to `replace` with the old value.
pub fn invert(patch: &Patch, applied: &Applied) -> Patch {
    let path = applied.path.clone();
    let old = || applied.displaced.clone().unwrap_or(Value::Null);
    match (patch.op, &applied.displaced) {
        (PatchOp::Add, None) => Patch::remove(path),
        (PatchOp::Add, Some(_)) | (PatchOp::Replace, _) => Patch::replace(path, old()),
        (PatchOp::Remove, _) => Patch::add(path, old()),
    }
}
