//! The blocking configuration engine.
//!
//! `ExplorerSync` runs the same externally observable algorithm as the
//! concurrent [`Explorer`](crate::explorer::Explorer) under a blocking
//! model: every operation executes to completion before returning, and
//! the caches store settled results directly. The duplication between
//! the two engines is deliberate, keeping the blocking path free of any
//! executor machinery.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::error::{Error, Result};
use crate::import::{take_import_paths, ImportChain};
use crate::merge::{merge_all, MergeOptions};
use crate::options::{ExplorerBuilder, ExplorerOptions};
use crate::paths::{absolutize, is_package_file};
use crate::result::FoundConfig;
use crate::value::{get_property, is_empty_value};
use crate::walk::{DirectoryCandidate, DirectoryWalk};

type CachedResult = Result<Option<FoundConfig>>;

/// Blocking engine for configuration discovery.
///
/// Owns two private caches (by file path and by directory path) that
/// live for the engine instance's lifetime; the filesystem is assumed
/// static for that lifetime unless a `clear_*` method is called.
///
/// # Examples
///
/// ```no_run
/// use figtree::ExplorerSync;
///
/// let explorer = ExplorerSync::builder("myapp").build_sync().unwrap();
/// if let Some(found) = explorer.search(".").unwrap() {
///     println!("config at {}", found.filepath.display());
/// }
/// ```
pub struct ExplorerSync {
    options: Arc<ExplorerOptions>,
    load_cache: Mutex<HashMap<PathBuf, CachedResult>>,
    search_cache: Mutex<HashMap<PathBuf, CachedResult>>,
}

impl fmt::Debug for ExplorerSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplorerSync")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ExplorerSync {
    /// Start building an engine for the given module name.
    #[must_use]
    pub fn builder(module_name: &str) -> ExplorerBuilder {
        ExplorerBuilder::new(module_name)
    }

    pub(crate) fn from_options(options: ExplorerOptions) -> Self {
        Self {
            options: Arc::new(options),
            load_cache: Mutex::new(HashMap::new()),
            search_cache: Mutex::new(HashMap::new()),
        }
    }

    /// The resolved options this engine was built with.
    #[must_use]
    pub fn options(&self) -> &ExplorerOptions {
        &self.options
    }

    /// Load one specific configuration file.
    ///
    /// The path is made absolute, read, parsed through the loader for
    /// its extension, `$import`-merged, and normalized. Results
    /// (including errors) are cached per absolute path.
    ///
    /// # Errors
    ///
    /// Propagates read failures, parse errors, missing loaders, and
    /// invalid or cyclic imports.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Option<FoundConfig>> {
        let abs = absolutize(path.as_ref())?;
        if !self.options.cache {
            return self.load_terminal(&abs);
        }

        if let Some(cached) = self
            .load_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&abs)
        {
            log::debug!("load cache hit for {}", abs.display());
            return cached.clone();
        }

        let result = self.load_terminal(&abs);
        self.load_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(abs, result.clone());
        result
    }

    /// Search for configuration starting from a directory.
    ///
    /// A discovered meta-configuration is consulted first and returned
    /// immediately when non-empty. Otherwise directories are probed in
    /// the strategy's order, each against the configured search places;
    /// per-directory results are cached.
    ///
    /// # Errors
    ///
    /// Propagates any error that is not a search-place skip condition.
    pub fn search(&self, from_dir: impl AsRef<Path>) -> Result<Option<FoundConfig>> {
        if let Some(meta_path) = self.options.meta_config_path.clone() {
            if let Some(found) = self.load(&meta_path)? {
                if !found.is_empty {
                    return Ok(Some(found));
                }
            }
        }

        let from = absolutize(from_dir.as_ref())?;
        let mut walk = DirectoryWalk::new(
            &from,
            self.options.strategy,
            self.options.stop_dir.as_deref(),
            &self.options.module_name,
        )?;
        let Some(first) = walk.next() else {
            return Err(Error::InvariantViolation {
                message: format!("directory walk from {} yielded no candidates", from.display()),
            });
        };
        self.search_chain(first, walk)
    }

    /// Forget all cached `load` results.
    pub fn clear_load_cache(&self) {
        self.load_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Forget all cached `search` results.
    pub fn clear_search_cache(&self) {
        self.search_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Forget everything this engine has cached.
    pub fn clear_caches(&self) {
        self.clear_load_cache();
        self.clear_search_cache();
    }

    fn load_terminal(&self, abs: &Path) -> Result<Option<FoundConfig>> {
        let value = self.load_value(abs, &ImportChain::start(abs.to_path_buf()))?;
        let found = FoundConfig::normalize(abs, value);
        (self.options.transform)(Some(found))
    }

    /// The per-file pipeline: read, parse, import-merge, extract.
    fn load_value(&self, path: &Path, chain: &ImportChain) -> Result<Value> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::read(path, &e))?;

        let mut value = if content.trim().is_empty() {
            Value::Null
        } else {
            let loader = self.options.loaders.for_path(path)?;
            loader.load(path, &content).map_err(|e| Error::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        if let Some(targets) = take_import_paths(&mut value, path)? {
            let mut sources = Vec::with_capacity(targets.len() + 1);
            for target in targets {
                let next_chain = chain.extended(&target)?;
                let imported = self.load_value(&target, &next_chain)?;
                // A blank imported file contributes nothing rather than
                // clobbering what earlier imports merged.
                if !is_empty_value(&imported) {
                    sources.push(imported);
                }
            }
            // The importing file's own keys merge last and win.
            sources.push(value);
            value = merge_all(
                sources,
                &MergeOptions {
                    merge_arrays: self.options.merge_import_arrays,
                },
            );
        }

        if is_package_file(path) {
            value = get_property(&value, &self.options.package_prop)
                .cloned()
                .unwrap_or(Value::Null);
        }

        Ok(value)
    }

    fn search_chain(
        &self,
        candidate: DirectoryCandidate,
        walk: DirectoryWalk,
    ) -> Result<Option<FoundConfig>> {
        if self.options.cache {
            if let Some(cached) = self
                .search_cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&candidate.path)
            {
                log::debug!("search cache hit for {}", candidate.path.display());
                return cached.clone();
            }
        }

        let key = candidate.path.clone();
        let result = self.search_candidate(candidate, walk);
        if self.options.cache {
            self.search_cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key, result.clone());
        }
        result
    }

    fn search_candidate(
        &self,
        candidate: DirectoryCandidate,
        mut walk: DirectoryWalk,
    ) -> Result<Option<FoundConfig>> {
        if candidate.path.is_dir() {
            let places = if candidate.is_global {
                &self.options.global_search_places
            } else {
                &self.options.search_places
            };

            for place in places {
                let path = candidate.path.join(place);
                log::trace!("probing {}", path.display());
                match self.load_value(&path, &ImportChain::start(path.clone())) {
                    Ok(value) => {
                        let found = FoundConfig::normalize(&path, value);
                        if found.is_empty && self.options.ignore_empty_search_places {
                            log::debug!("skipping empty config at {}", path.display());
                            continue;
                        }
                        return (self.options.transform)(Some(found));
                    }
                    Err(err) if err.is_search_place_skip() => continue,
                    Err(err) => return Err(err),
                }
            }
        }

        match walk.next() {
            Some(next) => self.search_chain(next, walk),
            None => (self.options.transform)(None),
        }
    }
}
