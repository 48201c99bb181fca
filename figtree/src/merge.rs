//! Deep merging of parsed configuration values.
//!
//! This module implements the structural, non-commutative merge used for
//! `$import` resolution: later sources win on scalar conflicts, objects
//! merge recursively, and arrays either accumulate or replace depending
//! on policy.

use serde_json::Value;

/// Policy knobs for [`merge_all`] and [`merge_into`].
///
/// # Examples
///
/// ```
/// use figtree::merge::MergeOptions;
///
/// let accumulate = MergeOptions { merge_arrays: true };
/// let replace = MergeOptions::default();
/// assert!(!replace.merge_arrays);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// When true, an incoming array appends to an existing one instead
    /// of replacing it.
    pub merge_arrays: bool,
}

/// Fold a sequence of values left-to-right into a single object.
///
/// The accumulator starts as an empty object; each source is merged with
/// [`merge_into`], so later sources take precedence on conflicts.
///
/// # Examples
///
/// ```
/// use figtree::merge::{merge_all, MergeOptions};
/// use serde_json::json;
///
/// let merged = merge_all(
///     vec![json!({"a": 1, "b": 1}), json!({"b": 2})],
///     &MergeOptions::default(),
/// );
/// assert_eq!(merged, json!({"a": 1, "b": 2}));
/// ```
#[must_use]
pub fn merge_all(sources: impl IntoIterator<Item = Value>, options: &MergeOptions) -> Value {
    let mut accumulator = Value::Object(serde_json::Map::new());
    for source in sources {
        merge_into(&mut accumulator, source, options);
    }
    accumulator
}

/// Merge `source` into `target` in place.
///
/// Rules, applied per key in source order:
/// - a key the target does not own is taken verbatim;
/// - two arrays append when `merge_arrays`, else the incoming one wins;
/// - two objects merge recursively;
/// - anything else is replaced by the incoming value.
///
/// A non-object source replaces the target wholesale.
pub fn merge_into(target: &mut Value, source: Value, options: &MergeOptions) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, incoming) in source_map {
                match target_map.get_mut(&key) {
                    Some(existing) => merge_value(existing, incoming, options),
                    None => {
                        target_map.insert(key, incoming);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

fn merge_value(existing: &mut Value, incoming: Value, options: &MergeOptions) {
    match (existing, incoming) {
        (Value::Array(existing_items), Value::Array(incoming_items)) => {
            if options.merge_arrays {
                existing_items.extend(incoming_items);
            } else {
                *existing_items = incoming_items;
            }
        }
        (existing @ Value::Object(_), incoming @ Value::Object(_)) => {
            merge_into(existing, incoming, options);
        }
        (existing, incoming) => *existing = incoming,
    }
}
