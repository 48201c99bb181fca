//! Directory sequencing for configuration search.
//!
//! This module produces the ordered sequence of candidate directories a
//! search probes, as an explicit iterator type. Three strategies exist:
//!
//! - `none`: only the start directory;
//! - `project`: upward walk to the filesystem root, stopping after the
//!   first directory containing a package manifest marker;
//! - `global`: upward walk to a stop directory (the home directory by
//!   default), followed by the platform's global configuration
//!   directories.
//!
//! The walk is lazy and finite; restarting a search always builds a
//! fresh walk from scratch.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Marker files that bound a `project` strategy walk.
///
/// The directory containing a marker is still yielded; its parents are
/// not.
pub const PROJECT_MARKERS: [&str; 2] = ["package.json", "package.yaml"];

/// The algorithm selecting which directories a search probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Probe only the start directory.
    #[default]
    None,
    /// Walk upward until a project marker or the filesystem root.
    Project,
    /// Walk upward until the stop directory, then probe global
    /// configuration directories.
    Global,
}

impl SearchStrategy {
    /// Parse a strategy name.
    ///
    /// Recognizes `none`, `project`, and `global` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error message for unrecognized names.
    ///
    /// # Examples
    ///
    /// ```
    /// use figtree::walk::SearchStrategy;
    ///
    /// assert_eq!(SearchStrategy::parse("project").unwrap(), SearchStrategy::Project);
    /// assert!(SearchStrategy::parse("sideways").is_err());
    /// ```
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "project" => Ok(Self::Project),
            "global" => Ok(Self::Global),
            _ => Err(format!("invalid search strategy: {s}")),
        }
    }
}

/// One directory to probe, with the flag selecting which search-place
/// list applies there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryCandidate {
    /// Absolute directory path.
    pub path: PathBuf,
    /// True for platform global configuration directories, which use the
    /// global search-place list instead of the project one.
    pub is_global: bool,
}

/// The platform's global configuration directories for a module.
///
/// Yields, in order: the module's own XDG config directory
/// (`$XDG_CONFIG_HOME/<name>`, falling back to `~/.config/<name>`), the
/// XDG config directory itself, and the home directory.
///
/// # Errors
///
/// Returns [`Error::HomeDirectory`] when the home directory cannot be
/// determined.
pub fn global_config_dirs(module_name: &str) -> Result<Vec<PathBuf>> {
    let home = home::home_dir().ok_or(Error::HomeDirectory)?;
    let xdg = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .unwrap_or_else(|| home.join(".config"));
    Ok(vec![xdg.join(module_name), xdg, home])
}

/// Lazy, finite cursor over the directories a search probes.
///
/// # Examples
///
/// ```
/// use figtree::walk::{DirectoryWalk, SearchStrategy};
/// use std::path::Path;
///
/// let mut walk =
///     DirectoryWalk::new(Path::new("/a/b"), SearchStrategy::None, None, "app").unwrap();
/// let only = walk.next().unwrap();
/// assert_eq!(only.path, Path::new("/a/b"));
/// assert!(walk.next().is_none());
/// ```
#[derive(Debug)]
pub struct DirectoryWalk {
    state: WalkState,
}

#[derive(Debug)]
enum WalkState {
    Exhausted,
    Single(PathBuf),
    Project {
        current: PathBuf,
    },
    Upward {
        current: PathBuf,
        stop_dir: PathBuf,
        globals: Vec<PathBuf>,
    },
    Globals {
        remaining: std::vec::IntoIter<PathBuf>,
    },
}

impl DirectoryWalk {
    /// Build a walk starting at `start` (assumed absolute).
    ///
    /// For the `global` strategy, `stop_dir` defaults to the home
    /// directory and the global directories come from
    /// [`global_config_dirs`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::HomeDirectory`] when the `global` strategy needs
    /// the home directory and it cannot be determined.
    pub fn new(
        start: &Path,
        strategy: SearchStrategy,
        stop_dir: Option<&Path>,
        module_name: &str,
    ) -> Result<Self> {
        let state = match strategy {
            SearchStrategy::None => WalkState::Single(start.to_path_buf()),
            SearchStrategy::Project => WalkState::Project {
                current: start.to_path_buf(),
            },
            SearchStrategy::Global => {
                // Directories yielded by the walk are absolute, so the
                // bound must be too or the comparison never matches.
                let stop_dir = match stop_dir {
                    Some(dir) => crate::paths::absolutize(dir)?,
                    None => home::home_dir().ok_or(Error::HomeDirectory)?,
                };
                WalkState::Upward {
                    current: start.to_path_buf(),
                    stop_dir,
                    globals: global_config_dirs(module_name)?,
                }
            }
        };
        Ok(Self { state })
    }

    fn has_project_marker(dir: &Path) -> bool {
        PROJECT_MARKERS
            .iter()
            .any(|marker| dir.join(marker).is_file())
    }
}

impl Iterator for DirectoryWalk {
    type Item = DirectoryCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.state, WalkState::Exhausted) {
            WalkState::Exhausted => None,
            WalkState::Single(dir) => Some(DirectoryCandidate {
                path: dir,
                is_global: false,
            }),
            WalkState::Project { current } => {
                // The marker directory itself is still yielded.
                if !Self::has_project_marker(&current) {
                    if let Some(parent) = current.parent() {
                        self.state = WalkState::Project {
                            current: parent.to_path_buf(),
                        };
                    }
                }
                Some(DirectoryCandidate {
                    path: current,
                    is_global: false,
                })
            }
            WalkState::Upward {
                current,
                stop_dir,
                globals,
            } => {
                if current == stop_dir || current.parent().is_none() {
                    self.state = WalkState::Globals {
                        remaining: globals.into_iter(),
                    };
                } else if let Some(parent) = current.parent() {
                    self.state = WalkState::Upward {
                        current: parent.to_path_buf(),
                        stop_dir,
                        globals,
                    };
                }
                Some(DirectoryCandidate {
                    path: current,
                    is_global: false,
                })
            }
            WalkState::Globals { mut remaining } => {
                let dir = remaining.next()?;
                self.state = WalkState::Globals { remaining };
                Some(DirectoryCandidate {
                    path: dir,
                    is_global: true,
                })
            }
        }
    }
}
