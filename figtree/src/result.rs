//! The canonical result shape produced by `load` and `search`.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::value::is_empty_value;

/// A configuration found on disk, together with its source path.
///
/// Immutable once constructed: the engine only discards or returns
/// results, never mutates them in place. Engine operations produce
/// `Option<FoundConfig>`, where `None` means nothing was found.
///
/// # Examples
///
/// ```
/// use figtree::result::FoundConfig;
/// use serde_json::json;
/// use std::path::Path;
///
/// let found = FoundConfig::normalize(Path::new("/p/.apprc.json"), json!({"a": 1}));
/// assert!(!found.is_empty);
/// assert_eq!(found.config, json!({"a": 1}));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundConfig {
    /// The parsed (and import-merged) configuration value.
    pub config: Value,
    /// Absolute path of the file the configuration came from.
    pub filepath: PathBuf,
    /// True when the file existed but held no configuration.
    pub is_empty: bool,
}

impl FoundConfig {
    /// Wrap a parsed value and its source path into a result record.
    ///
    /// A structurally empty value (blank file, `null`, or an object with
    /// no keys, including after package-property extraction) yields
    /// `is_empty: true` with the config normalized to `Null`.
    #[must_use]
    pub fn normalize(filepath: &Path, config: Value) -> Self {
        let is_empty = is_empty_value(&config);
        Self {
            config: if is_empty { Value::Null } else { config },
            filepath: filepath.to_path_buf(),
            is_empty,
        }
    }
}
