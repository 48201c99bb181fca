//! Small path utilities used by the engines.
//!
//! Cache keys and result paths are always absolute and lexically
//! normalized, so that `./a`, `a`, and `/cwd/a` all name the same cache
//! entry. Symlinks are deliberately not resolved; the engine operates on
//! the paths the caller named.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Convert a path to an absolute, lexically normalized form.
///
/// Relative paths are resolved against the current working directory.
/// `.` components are dropped and `..` components pop their parent; as
/// in POSIX path resolution, `..` at the root stays at the root.
///
/// # Errors
///
/// Returns an error if the working directory cannot be determined.
///
/// # Examples
///
/// ```
/// use figtree::paths::absolutize;
/// use std::path::{Path, PathBuf};
///
/// let abs = absolutize(Path::new("/a/./b/../c")).unwrap();
/// assert_eq!(abs, PathBuf::from("/a/c"));
/// ```
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = env::current_dir().map_err(|e| Error::read(path, &e))?;
        cwd.join(path)
    };
    Ok(resolve_components(&absolute))
}

/// Resolve `.` and `..` components in an absolute path.
fn resolve_components(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::RootDir => result.push(component),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::Normal(part) => result.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                // A pop at the root is a no-op, so `/..` resolves to `/`.
                result.pop();
            }
        }
    }

    result
}

/// Check whether a path names a `package.json`-style manifest, i.e. its
/// file stem is `package`.
#[must_use]
pub(crate) fn is_package_file(path: &Path) -> bool {
    path.file_stem().is_some_and(|stem| stem == "package")
}
