//! `$import` directive handling.
//!
//! A loaded file whose top-level object carries an `$import` key pulls
//! in other configuration files before its own keys apply. This module
//! provides the directive extraction and the chain type used for cycle
//! detection; the actual recursive loading lives in the engines.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{Error, Result};
use crate::paths::absolutize;

/// The key recognized as an import directive.
pub const IMPORT_KEY: &str = "$import";

/// The ordered list of files currently open in one recursive load.
///
/// Exists only for the duration of a single `load` call; never
/// persisted. Pushing a path already on the chain is a cyclic-import
/// error.
#[derive(Debug, Clone, Default)]
pub(crate) struct ImportChain(Vec<PathBuf>);

impl ImportChain {
    /// Start a chain at the root file of a load.
    pub(crate) fn start(root: PathBuf) -> Self {
        Self(vec![root])
    }

    /// Return a chain extended with `next`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CyclicImport`] when `next` is already open.
    pub(crate) fn extended(&self, next: &Path) -> Result<Self> {
        if self.0.iter().any(|open| open == next) {
            return Err(Error::CyclicImport {
                path: next.to_path_buf(),
                chain: self.0.clone(),
            });
        }
        let mut chain = self.0.clone();
        chain.push(next.to_path_buf());
        Ok(Self(chain))
    }
}

/// Strip and resolve the `$import` directive of a loaded value.
///
/// Returns the import targets in declared order, resolved relative to
/// the importing file's directory, or `None` when the value carries no
/// directive. The `$import` key itself is removed from the value.
///
/// # Errors
///
/// Returns [`Error::InvalidImport`] when the directive is neither a
/// string nor an array of strings.
pub(crate) fn take_import_paths(
    value: &mut Value,
    importing_file: &Path,
) -> Result<Option<Vec<PathBuf>>> {
    let Some(directive) = value
        .as_object_mut()
        .and_then(|map| map.remove(IMPORT_KEY))
    else {
        return Ok(None);
    };

    let raw_targets: Vec<String> = match directive {
        Value::String(target) => vec![target],
        Value::Array(items) => {
            let mut targets = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(target) => targets.push(target),
                    other => {
                        return Err(Error::InvalidImport {
                            path: importing_file.to_path_buf(),
                            reason: format!(
                                "expected an array of path strings, found {other}"
                            ),
                        });
                    }
                }
            }
            targets
        }
        other => {
            return Err(Error::InvalidImport {
                path: importing_file.to_path_buf(),
                reason: format!("expected a path string or array of path strings, found {other}"),
            });
        }
    };

    let base = importing_file.parent().unwrap_or_else(|| Path::new("/"));
    let mut resolved = Vec::with_capacity(raw_targets.len());
    for target in raw_targets {
        resolved.push(absolutize(&base.join(target))?);
    }
    Ok(Some(resolved))
}
