//! JSON codec for patches.
//!
//! Converts patches to/from `serde_json::Value` in RFC 6902 object form:
//! `{"op": "replace", "path": "/cards/0/x", "value": 12}`.

use patch_history_pointer::{format_json_pointer, parse_json_pointer, validate_json_pointer};
use serde_json::{json, Map, Value};

use crate::types::{Patch, PatchError, PatchOp};

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize a `Patch` to a `serde_json::Value`.
pub fn to_json(patch: &Patch) -> Value {
    let mut m = Map::new();
    m.insert("op".into(), json!(patch.op.as_str()));
    m.insert("path".into(), Value::String(format_json_pointer(&patch.path)));
    if let Some(value) = &patch.value {
        m.insert("value".into(), value.clone());
    }
    Value::Object(m)
}

/// Serialize a patch list to a JSON array.
pub fn to_json_patch(patches: &[Patch]) -> Value {
    Value::Array(patches.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize one patch.
///
/// # Errors
///
/// [`PatchError::InvalidOp`] for a non-object, an unknown `op`, or a bad
/// `path`; [`PatchError::MissingValue`] for `add`/`replace` without `value`.
pub fn from_json(v: &Value) -> Result<Patch, PatchError> {
    let map = v
        .as_object()
        .ok_or_else(|| PatchError::InvalidOp("patch must be an object".into()))?;
    let op = map
        .get("op")
        .and_then(Value::as_str)
        .ok_or_else(|| PatchError::InvalidOp("op must be a string".into()))?;
    let op = PatchOp::from_str(op)?;
    let pointer = map
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| PatchError::InvalidOp("path must be a string".into()))?;
    validate_json_pointer(pointer).map_err(|e| PatchError::InvalidOp(e.to_string()))?;
    let value = map.get("value").cloned();
    if op != PatchOp::Remove && value.is_none() {
        return Err(PatchError::MissingValue);
    }
    Ok(Patch {
        op,
        path: parse_json_pointer(pointer),
        value: if op == PatchOp::Remove { None } else { value },
    })
}

/// Deserialize a JSON array of patches.
pub fn from_json_patch(v: &Value) -> Result<Vec<Patch>, PatchError> {
    let arr = v
        .as_array()
        .ok_or_else(|| PatchError::InvalidOp("patch list must be an array".into()))?;
    arr.iter().map(from_json).collect()
}
