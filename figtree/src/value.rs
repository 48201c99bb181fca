//! Helpers for working with parsed configuration values.
//!
//! Configuration files of every supported format are parsed into
//! [`serde_json::Value`], which acts as the engine's canonical in-memory
//! representation. This module provides the property-path accessor used
//! to extract a tool's sub-object from `package.json`-style manifests,
//! and the structural-emptiness test used by the result normalizer.

use serde_json::Value;

/// A property lookup into a parsed manifest.
///
/// Either a single key (checked first as a literal own key, so names
/// containing dots are supported) or an explicit ordered list of path
/// segments.
///
/// # Examples
///
/// ```
/// use figtree::value::{get_property, PackageProp};
/// use serde_json::json;
///
/// let manifest = json!({"name": "x", "tool": {"port": 1}});
/// let prop = PackageProp::from("tool");
/// assert_eq!(get_property(&manifest, &prop), Some(&json!({"port": 1})));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageProp {
    /// A single key, possibly containing dots.
    Key(String),
    /// An explicit sequence of path segments.
    Segments(Vec<String>),
}

impl From<&str> for PackageProp {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PackageProp {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<Vec<String>> for PackageProp {
    fn from(segments: Vec<String>) -> Self {
        Self::Segments(segments)
    }
}

/// Look up a property in a parsed value.
///
/// For [`PackageProp::Key`], a literal top-level key containing dots is
/// preferred over path-splitting; only when no such key exists is the
/// key split on `.` and walked as a path. [`PackageProp::Segments`] is
/// always walked segment by segment.
///
/// Returns `None` if any step of the walk fails.
///
/// # Examples
///
/// ```
/// use figtree::value::{get_property, PackageProp};
/// use serde_json::json;
///
/// let value = json!({"a.b": 1, "a": {"b": 2}});
///
/// // Literal key wins over path-splitting.
/// let dotted = PackageProp::from("a.b");
/// assert_eq!(get_property(&value, &dotted), Some(&json!(1)));
///
/// // Explicit segments always walk.
/// let segments = PackageProp::from(vec!["a".to_string(), "b".to_string()]);
/// assert_eq!(get_property(&value, &segments), Some(&json!(2)));
/// ```
#[must_use]
pub fn get_property<'v>(value: &'v Value, prop: &PackageProp) -> Option<&'v Value> {
    match prop {
        PackageProp::Key(key) => {
            if let Some(found) = value.as_object().and_then(|map| map.get(key)) {
                return Some(found);
            }
            if key.contains('.') {
                walk_segments(value, key.split('.'))
            } else {
                None
            }
        }
        PackageProp::Segments(segments) => {
            walk_segments(value, segments.iter().map(String::as_str))
        }
    }
}

fn walk_segments<'v, 'k>(
    value: &'v Value,
    segments: impl Iterator<Item = &'k str>,
) -> Option<&'v Value> {
    let mut current = value;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Check whether a parsed value is structurally empty.
///
/// A value counts as empty when it is `Null` (blank file, or a manifest
/// without the requested property) or an object with zero keys.
///
/// # Examples
///
/// ```
/// use figtree::value::is_empty_value;
/// use serde_json::json;
///
/// assert!(is_empty_value(&serde_json::Value::Null));
/// assert!(is_empty_value(&json!({})));
/// assert!(!is_empty_value(&json!({"a": 1})));
/// assert!(!is_empty_value(&json!([])));
/// ```
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
