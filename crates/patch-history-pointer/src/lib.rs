//! Path addressing for the patch-history engine.
//!
//! A path is an ordered sequence of keys: object field names or array
//! indices written as decimal strings. Paths render to and from
//! [JSON Pointer (RFC 6901)](https://tools.ietf.org/html/rfc6901) strings.
//!
//! # Example
//!
//! ```
//! use patch_history_pointer::{format_json_pointer, get, parse_json_pointer};
//!
//! let path = parse_json_pointer("/cards/0/x");
//! assert_eq!(path, vec!["cards", "0", "x"]);
//! assert_eq!(format_json_pointer(&path), "/cards/0/x");
//!
//! let doc = serde_json::json!({"cards": [{"x": 12}]});
//! assert_eq!(get(&doc, &path), Some(&serde_json::json!(12)));
//! ```

use thiserror::Error;

pub mod get;
pub mod types;
pub mod util;
pub mod validate;

pub use get::{get, get_mut};
pub use types::{Path, PathStep};
pub use util::{
    escape_component, format_json_pointer, is_child, is_path_equal, is_root, is_valid_index,
    parent, parse_json_pointer, unescape_component,
};
pub use validate::{validate_json_pointer, validate_path, ValidationError};

/// Errors produced while navigating paths.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("NO_PARENT")]
    NoParent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(steps: &[&str]) -> Path {
        steps.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unescape_component() {
        assert_eq!(unescape_component("a~0b"), "a~b");
        assert_eq!(unescape_component("c~1d"), "c/d");
        assert_eq!(unescape_component("~01"), "~1");
    }

    #[test]
    fn test_escape_component() {
        assert_eq!(escape_component("a~b"), "a~0b");
        assert_eq!(escape_component("c/d"), "c~1d");
        assert_eq!(escape_component("plain"), "plain");
    }

    #[test]
    fn test_parse_json_pointer() {
        assert_eq!(parse_json_pointer(""), Vec::<String>::new());
        assert_eq!(parse_json_pointer("/"), p(&[""]));
        assert_eq!(parse_json_pointer("/a~0b/c~1d"), p(&["a~b", "c/d"]));
    }

    #[test]
    fn test_format_json_pointer() {
        assert_eq!(format_json_pointer(&[]), "");
        assert_eq!(format_json_pointer(&p(&["board", "a/b"])), "/board/a~1b");
    }

    #[test]
    fn test_is_child() {
        assert!(is_child(&p(&["cards"]), &p(&["cards", "1"])));
        assert!(!is_child(&p(&["cards", "1"]), &p(&["cards"])));
        assert!(!is_child(&p(&["cards"]), &p(&["cards"])));
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent(&p(&["a", "b"])).unwrap(), p(&["a"]));
        assert_eq!(parent(&[]), Err(PointerError::NoParent));
    }

    #[test]
    fn test_get_mixed() {
        let doc = json!({"cards": [{"title": "one"}, {"title": "two"}]});
        assert_eq!(get(&doc, &p(&["cards", "1", "title"])), Some(&json!("two")));
        assert_eq!(get(&doc, &p(&["cards", "-"])), None);
        assert_eq!(get(&doc, &p(&["cards", "x"])), None);
    }
}
