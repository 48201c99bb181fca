//! The concurrent configuration engine.
//!
//! `Explorer` mirrors [`ExplorerSync`](crate::explorer_sync::ExplorerSync)
//! under a suspension model: file reads and loader invocations may
//! await, and the caches key *in-flight* computations, not only settled
//! values. Concurrent `load` calls for the same absolute path (and
//! concurrent `search` calls for the same directory) share one pending
//! computation; no lock is held across an await point.
//!
//! The engine handle is cheap to clone — clones share options and
//! caches — which is what lets cached computations be `'static`.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::import::{take_import_paths, ImportChain};
use crate::merge::{merge_all, MergeOptions};
use crate::options::{ExplorerBuilder, ExplorerOptions};
use crate::paths::{absolutize, is_package_file};
use crate::result::FoundConfig;
use crate::value::{get_property, is_empty_value};
use crate::walk::{DirectoryCandidate, DirectoryWalk};

/// A computation that settles to a load/search result and can be
/// awaited by any number of callers.
type SharedResult = Shared<BoxFuture<'static, Result<Option<FoundConfig>>>>;

type CacheMap = Mutex<HashMap<PathBuf, SharedResult>>;

/// Concurrent engine for configuration discovery.
///
/// Cloning produces another handle to the same engine instance: the
/// options and both caches are shared. Callers needing isolation must
/// build separate instances.
///
/// # Examples
///
/// ```no_run
/// use figtree::Explorer;
///
/// # async fn example() -> figtree::Result<()> {
/// let explorer = Explorer::builder("myapp").build()?;
/// if let Some(found) = explorer.search(".").await? {
///     println!("config at {}", found.filepath.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Explorer {
    options: Arc<ExplorerOptions>,
    load_cache: Arc<CacheMap>,
    search_cache: Arc<CacheMap>,
}

impl fmt::Debug for Explorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Explorer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Explorer {
    /// Start building an engine for the given module name.
    #[must_use]
    pub fn builder(module_name: &str) -> ExplorerBuilder {
        ExplorerBuilder::new(module_name)
    }

    pub(crate) fn from_options(options: ExplorerOptions) -> Self {
        Self {
            options: Arc::new(options),
            load_cache: Arc::new(Mutex::new(HashMap::new())),
            search_cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The resolved options this engine was built with.
    #[must_use]
    pub fn options(&self) -> &ExplorerOptions {
        &self.options
    }

    /// Load one specific configuration file.
    ///
    /// Identical contract to [`ExplorerSync::load`], except that
    /// concurrent calls for the same absolute path before the first
    /// settles share a single underlying computation.
    ///
    /// # Errors
    ///
    /// Propagates read failures, parse errors, missing loaders, and
    /// invalid or cyclic imports.
    ///
    /// [`ExplorerSync::load`]: crate::explorer_sync::ExplorerSync::load
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<Option<FoundConfig>> {
        let abs = absolutize(path.as_ref())?;
        if !self.options.cache {
            return self.load_terminal(abs).await;
        }

        let shared = {
            let mut cache = self
                .load_cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match cache.get(&abs) {
                Some(existing) => {
                    log::debug!("load cache hit for {}", abs.display());
                    existing.clone()
                }
                None => {
                    let this = self.clone();
                    let target = abs.clone();
                    let computation = async move { this.load_terminal(target).await }
                        .boxed()
                        .shared();
                    cache.insert(abs, computation.clone());
                    computation
                }
            }
        };
        shared.await
    }

    /// Search for configuration starting from a directory.
    ///
    /// Identical contract to [`ExplorerSync::search`], with per-starting-
    /// directory coalescing of concurrent calls.
    ///
    /// # Errors
    ///
    /// Propagates any error that is not a search-place skip condition.
    ///
    /// [`ExplorerSync::search`]: crate::explorer_sync::ExplorerSync::search
    pub async fn search(&self, from_dir: impl AsRef<Path>) -> Result<Option<FoundConfig>> {
        if let Some(meta_path) = self.options.meta_config_path.clone() {
            if let Some(found) = self.load(&meta_path).await? {
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
        self.search_chain(first, walk).await
    }

    /// Forget all cached `load` computations.
    ///
    /// Computations already in flight still settle; their values are
    /// simply not reused afterwards.
    pub fn clear_load_cache(&self) {
        self.load_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Forget all cached `search` computations.
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

    async fn load_terminal(&self, abs: PathBuf) -> Result<Option<FoundConfig>> {
        let chain = ImportChain::start(abs.clone());
        let value = self.load_value(&abs, &chain).await?;
        let found = FoundConfig::normalize(&abs, value);
        (self.options.transform)(Some(found))
    }

    /// The per-file pipeline: read, parse, import-merge, extract.
    fn load_value<'a>(
        &'a self,
        path: &'a Path,
        chain: &'a ImportChain,
    ) -> BoxFuture<'a, Result<Value>> {
        async move {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| Error::read(path, &e))?;

            let mut value = if content.trim().is_empty() {
                Value::Null
            } else {
                let loader = self.options.loaders.for_path(path)?;
                loader
                    .load_async(path, &content)
                    .await
                    .map_err(|e| Error::Parse {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?
            };

            if let Some(targets) = take_import_paths(&mut value, path)? {
                let mut sources = Vec::with_capacity(targets.len() + 1);
                for target in targets {
                    let next_chain = chain.extended(&target)?;
                    let imported = self.load_value(&target, &next_chain).await?;
                    // A blank imported file contributes nothing rather
                    // than clobbering what earlier imports merged.
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
        .boxed()
    }

    fn search_chain(
        &self,
        candidate: DirectoryCandidate,
        walk: DirectoryWalk,
    ) -> BoxFuture<'static, Result<Option<FoundConfig>>> {
        let this = self.clone();
        async move {
            if !this.options.cache {
                return this.search_candidate(candidate, walk).await;
            }

            let shared = {
                let mut cache = this
                    .search_cache
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                match cache.get(&candidate.path) {
                    Some(existing) => {
                        log::debug!("search cache hit for {}", candidate.path.display());
                        existing.clone()
                    }
                    None => {
                        let key = candidate.path.clone();
                        let inner = this.clone();
                        let computation =
                            async move { inner.search_candidate(candidate, walk).await }
                                .boxed()
                                .shared();
                        cache.insert(key, computation.clone());
                        computation
                    }
                }
            };
            shared.await
        }
        .boxed()
    }

    async fn search_candidate(
        &self,
        candidate: DirectoryCandidate,
        mut walk: DirectoryWalk,
    ) -> Result<Option<FoundConfig>> {
        let is_dir = tokio::fs::metadata(&candidate.path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);

        if is_dir {
            let places = if candidate.is_global {
                &self.options.global_search_places
            } else {
                &self.options.search_places
            };

            for place in places {
                let path = candidate.path.join(place);
                log::trace!("probing {}", path.display());
                match self.load_value(&path, &ImportChain::start(path.clone())).await {
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
            Some(next) => self.search_chain(next, walk).await,
            None => (self.options.transform)(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::{Loader, LoaderError, LoaderRegistry};
    use serde_json::json;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingLoader(Arc<AtomicUsize>);

    impl Loader for CountingLoader {
        fn load(&self, _path: &Path, content: &str) -> std::result::Result<Value, LoaderError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            serde_json::from_str(content).map_err(LoaderError::new)
        }
    }

    fn explorer(temp: &TempDir) -> Explorer {
        Explorer::builder("testapp")
            .with_meta_search_dir(temp.path().to_path_buf())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_load_json_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".testapprc.json");
        fs::write(&path, r#"{"port": 8080}"#).unwrap();

        let found = explorer(&temp).load(&path).await.unwrap().unwrap();
        assert_eq!(found.config, json!({"port": 8080}));
        assert!(!found.is_empty);
    }

    #[tokio::test]
    async fn test_search_matches_sync_engine() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".testapprc.yaml"), "a: 1\n").unwrap();

        let async_found = explorer(&temp).search(temp.path()).await.unwrap().unwrap();
        let sync_found = crate::ExplorerSync::builder("testapp")
            .with_meta_search_dir(temp.path().to_path_buf())
            .build_sync()
            .unwrap()
            .search(temp.path())
            .unwrap()
            .unwrap();

        assert_eq!(async_found, sync_found);
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_computation() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".testapprc.json");
        fs::write(&path, r#"{"v": 1}"#).unwrap();

        let count = Arc::new(AtomicUsize::new(0));
        let explorer = Explorer::builder("testapp")
            .with_meta_search_dir(temp.path().to_path_buf())
            .with_loaders(
                LoaderRegistry::defaults()
                    .with_loader("json", Arc::new(CountingLoader(Arc::clone(&count)))),
            )
            .build()
            .unwrap();

        let (first, second) = tokio::join!(explorer.load(&path), explorer.load(&path));
        assert_eq!(first.unwrap(), second.unwrap());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".testapprc.json");
        fs::write(&path, r#"{"v": 1}"#).unwrap();

        let count = Arc::new(AtomicUsize::new(0));
        let explorer = Explorer::builder("testapp")
            .with_meta_search_dir(temp.path().to_path_buf())
            .with_loaders(
                LoaderRegistry::defaults()
                    .with_loader("json", Arc::new(CountingLoader(Arc::clone(&count)))),
            )
            .build()
            .unwrap();

        explorer.load(&path).await.unwrap();
        explorer.load(&path).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        explorer.clear_load_cache();
        explorer.load(&path).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
