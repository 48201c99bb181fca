//! Error types for the figtree library.
//!
//! This module provides a comprehensive error hierarchy for configuration
//! discovery and loading, using `thiserror` for ergonomic error handling.
//!
//! All variants are `Clone` so that settled results can live in the
//! engine's caches and be handed out to multiple callers. I/O failures
//! keep their [`std::io::ErrorKind`] so the search logic can classify
//! them, with the original message rendered to a string.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a figtree error.
///
/// # Examples
///
/// ```
/// use figtree::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the figtree library.
///
/// This enum encompasses all possible error conditions that can occur
/// while resolving, loading, or merging configuration files.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A loader rejected the content of a configuration file.
    #[error("failed to parse {}: {message}", path.display())]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// The loader's description of the failure.
        message: String,
    },

    /// No loader is registered for a file's extension.
    #[error("no loader registered for extension '{extension}' ({})", path.display())]
    MissingLoader {
        /// The file whose extension has no loader.
        path: PathBuf,
        /// The extension that could not be dispatched (empty for none).
        extension: String,
    },

    /// An `$import` directive had an invalid shape.
    #[error("invalid $import in {}: {reason}", path.display())]
    InvalidImport {
        /// The file containing the directive.
        path: PathBuf,
        /// The reason the directive is invalid.
        reason: String,
    },

    /// A cyclic `$import` chain was detected.
    #[error("cyclic $import of {} (chain: {})", path.display(), format_chain(chain))]
    CyclicImport {
        /// The file that closed the cycle.
        path: PathBuf,
        /// The import chain that was open when the cycle was found.
        chain: Vec<PathBuf>,
    },

    /// An I/O error occurred while reading a file or directory.
    #[error("failed to read {}: {message}", path.display())]
    Read {
        /// The path that could not be read.
        path: PathBuf,
        /// The kind of I/O failure, used for search-place skip logic.
        kind: io::ErrorKind,
        /// The rendered I/O error message.
        message: String,
    },

    /// An incompatible combination of engine options was supplied.
    #[error("configuration error: {message}")]
    Configuration {
        /// A description of the conflict.
        message: String,
    },

    /// A result transform hook failed.
    #[error("transform error: {message}")]
    Transform {
        /// The hook's description of the failure.
        message: String,
    },

    /// The home directory could not be determined.
    #[error("cannot determine home directory")]
    HomeDirectory,

    /// An internal invariant was violated.
    ///
    /// This is never expected in correct operation and indicates a defect
    /// in the engine itself.
    #[error("internal invariant violated: {message}")]
    InvariantViolation {
        /// A description of the violated invariant.
        message: String,
    },
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl Error {
    /// Build a [`Error::Read`] from an underlying I/O error.
    pub(crate) fn read(path: &std::path::Path, err: &io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// Check if this error means "this search place does not apply here".
    ///
    /// During a directory search, a probe that fails because the file does
    /// not exist, is a directory, sits under a non-directory, or is not
    /// readable due to permissions simply advances to the next search
    /// place. Any other error aborts the search.
    ///
    /// # Examples
    ///
    /// ```
    /// use figtree::Error;
    /// use std::io::ErrorKind;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::Read {
    ///     path: PathBuf::from("/missing/.apprc"),
    ///     kind: ErrorKind::NotFound,
    ///     message: "No such file or directory".to_string(),
    /// };
    /// assert!(err.is_search_place_skip());
    /// ```
    #[must_use]
    pub fn is_search_place_skip(&self) -> bool {
        match self {
            Self::Read { kind, .. } => matches!(
                kind,
                io::ErrorKind::NotFound
                    | io::ErrorKind::PermissionDenied
                    | io::ErrorKind::IsADirectory
                    | io::ErrorKind::NotADirectory
            ),
            _ => false,
        }
    }

    /// Check if this error reports a cyclic `$import`.
    #[must_use]
    pub fn is_cyclic_import(&self) -> bool {
        matches!(self, Self::CyclicImport { .. })
    }

    /// Check if this error reports an option conflict raised at engine
    /// construction.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
