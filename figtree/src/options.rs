//! Engine option resolution.
//!
//! This module provides the builder that assembles an engine instance:
//! defaults are filled in, the meta-configuration is discovered and
//! applied, `{name}` placeholders are substituted, and option conflicts
//! are rejected eagerly. The resolved [`ExplorerOptions`] value is
//! constructed once per engine instance and treated as read-only
//! thereafter.
//!
//! # Option Precedence
//!
//! Options are resolved from three layers, highest to lowest:
//!
//! 1. Explicit builder calls
//! 2. A discovered meta-configuration file
//! 3. Built-in defaults derived from the module name

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::explorer::Explorer;
use crate::explorer_sync::ExplorerSync;
use crate::loaders::LoaderRegistry;
use crate::meta;
use crate::result::FoundConfig;
use crate::value::PackageProp;
use crate::walk::SearchStrategy;

/// A caller-supplied hook applied exactly once to each terminal result
/// of `load` and `search`, including the not-found (`None`) terminal.
///
/// The hook may alter the result or veto it by returning `None`.
pub type Transform =
    Arc<dyn Fn(Option<FoundConfig>) -> Result<Option<FoundConfig>> + Send + Sync>;

/// The fully resolved, defaulted options for one engine instance.
///
/// Constructed by [`ExplorerBuilder::build`] / [`build_sync`] and never
/// mutated afterwards.
///
/// [`build_sync`]: ExplorerBuilder::build_sync
pub struct ExplorerOptions {
    /// The name configuration is being discovered for.
    pub module_name: String,
    /// Directory traversal strategy for `search`.
    pub strategy: SearchStrategy,
    /// Candidate file names probed in project directories, in order.
    pub search_places: Vec<String>,
    /// Candidate file names probed in global directories, in order.
    pub global_search_places: Vec<String>,
    /// Path of the discovered meta-configuration file, if any.
    pub meta_config_path: Option<PathBuf>,
    /// The frozen loader table.
    pub loaders: Arc<LoaderRegistry>,
    /// Whether load/search results are cached on the engine instance.
    pub cache: bool,
    /// Whether `search` transparently skips empty-but-present files.
    pub ignore_empty_search_places: bool,
    /// Whether `$import` merging appends arrays instead of replacing.
    pub merge_import_arrays: bool,
    /// Property extracted from `package.*` manifests.
    pub package_prop: PackageProp,
    /// Directory bounding the `global` strategy's upward walk.
    pub stop_dir: Option<PathBuf>,
    /// Result transform hook.
    pub transform: Transform,
}

impl fmt::Debug for ExplorerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplorerOptions")
            .field("module_name", &self.module_name)
            .field("strategy", &self.strategy)
            .field("search_places", &self.search_places)
            .field("global_search_places", &self.global_search_places)
            .field("meta_config_path", &self.meta_config_path)
            .field("loaders", &self.loaders)
            .field("cache", &self.cache)
            .field("ignore_empty_search_places", &self.ignore_empty_search_places)
            .field("merge_import_arrays", &self.merge_import_arrays)
            .field("package_prop", &self.package_prop)
            .field("stop_dir", &self.stop_dir)
            .finish_non_exhaustive()
    }
}

/// The default search places for a module name.
///
/// # Examples
///
/// ```
/// use figtree::options::default_search_places;
///
/// let places = default_search_places("app");
/// assert_eq!(places[0], "package.json");
/// assert!(places.contains(&".apprc.yaml".to_string()));
/// assert!(places.contains(&"app.config.toml".to_string()));
/// ```
#[must_use]
pub fn default_search_places(module_name: &str) -> Vec<String> {
    let mut places = vec!["package.json".to_string(), "package.yaml".to_string()];
    places.push(format!(".{module_name}rc"));
    for ext in ["json", "yaml", "yml", "toml"] {
        places.push(format!(".{module_name}rc.{ext}"));
    }
    places.push(format!(".config/{module_name}rc"));
    for ext in ["json", "yaml", "yml", "toml"] {
        places.push(format!(".config/{module_name}rc.{ext}"));
    }
    for ext in ["json", "yaml", "yml", "toml"] {
        places.push(format!("{module_name}.config.{ext}"));
    }
    places
}

/// The default search places for global configuration directories.
#[must_use]
pub fn default_global_search_places() -> Vec<String> {
    vec![
        "config".to_string(),
        "config.json".to_string(),
        "config.yaml".to_string(),
        "config.yml".to_string(),
        "config.toml".to_string(),
    ]
}

fn substitute_name(places: Vec<String>, module_name: &str) -> Vec<String> {
    places
        .into_iter()
        .map(|place| place.replace("{name}", module_name))
        .collect()
}

/// Builder for [`Explorer`] and [`ExplorerSync`] instances.
///
/// # Examples
///
/// ```no_run
/// use figtree::ExplorerBuilder;
///
/// let explorer = ExplorerBuilder::new("myapp")
///     .with_search_places(vec![".{name}rc.yaml".to_string(), "{name}.config.json".to_string()])
///     .build_sync()
///     .unwrap();
/// ```
pub struct ExplorerBuilder {
    module_name: String,
    strategy: Option<SearchStrategy>,
    search_places: Option<Vec<String>>,
    global_search_places: Option<Vec<String>>,
    loaders: Option<LoaderRegistry>,
    cache: Option<bool>,
    ignore_empty_search_places: Option<bool>,
    merge_import_arrays: Option<bool>,
    package_prop: Option<PackageProp>,
    stop_dir: Option<PathBuf>,
    transform: Option<Transform>,
    meta_search_dir: Option<PathBuf>,
    skip_meta: bool,
}

impl ExplorerBuilder {
    /// Create a builder for the given module name.
    #[must_use]
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            strategy: None,
            search_places: None,
            global_search_places: None,
            loaders: None,
            cache: None,
            ignore_empty_search_places: None,
            merge_import_arrays: None,
            package_prop: None,
            stop_dir: None,
            transform: None,
            meta_search_dir: None,
            skip_meta: false,
        }
    }

    /// Set the search strategy explicitly.
    #[must_use]
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Override the project search-place list.
    ///
    /// Entries may contain a `{name}` placeholder, substituted with the
    /// module name once at build time.
    #[must_use]
    pub fn with_search_places(mut self, places: Vec<String>) -> Self {
        self.search_places = Some(places);
        self
    }

    /// Override the global search-place list.
    #[must_use]
    pub fn with_global_search_places(mut self, places: Vec<String>) -> Self {
        self.global_search_places = Some(places);
        self
    }

    /// Replace the loader registry.
    #[must_use]
    pub fn with_loaders(mut self, loaders: LoaderRegistry) -> Self {
        self.loaders = Some(loaders);
        self
    }

    /// Enable or disable result caching (enabled by default).
    #[must_use]
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Control whether `search` skips empty-but-present files (on by
    /// default).
    #[must_use]
    pub fn with_ignore_empty_search_places(mut self, ignore: bool) -> Self {
        self.ignore_empty_search_places = Some(ignore);
        self
    }

    /// Control whether `$import` merging appends arrays (on by default).
    #[must_use]
    pub fn with_merge_import_arrays(mut self, merge: bool) -> Self {
        self.merge_import_arrays = Some(merge);
        self
    }

    /// Set the property extracted from `package.*` manifests.
    ///
    /// Defaults to the module name as a single key.
    #[must_use]
    pub fn with_package_prop(mut self, prop: impl Into<PackageProp>) -> Self {
        self.package_prop = Some(prop.into());
        self
    }

    /// Bound the upward walk at a directory.
    ///
    /// Supplying a stop directory selects the `global` strategy;
    /// combining it with any other explicit strategy is a configuration
    /// error.
    #[must_use]
    pub fn with_stop_dir(mut self, dir: PathBuf) -> Self {
        self.stop_dir = Some(dir);
        self
    }

    /// Install a result transform hook.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Search for the meta-configuration in `dir` instead of the current
    /// working directory.
    #[must_use]
    pub fn with_meta_search_dir(mut self, dir: PathBuf) -> Self {
        self.meta_search_dir = Some(dir);
        self
    }

    /// Skip meta-configuration discovery entirely.
    #[must_use]
    pub fn without_meta_config(mut self) -> Self {
        self.skip_meta = true;
        self
    }

    /// Build the concurrent engine.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for conflicting options or an
    /// invalid meta-configuration.
    pub fn build(self) -> Result<Explorer> {
        Ok(Explorer::from_options(self.resolve()?))
    }

    /// Build the blocking engine.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for conflicting options or an
    /// invalid meta-configuration.
    pub fn build_sync(self) -> Result<ExplorerSync> {
        Ok(ExplorerSync::from_options(self.resolve()?))
    }

    fn resolve(self) -> Result<ExplorerOptions> {
        let strategy = match (self.strategy, &self.stop_dir) {
            (Some(SearchStrategy::Global) | None, Some(_)) => SearchStrategy::Global,
            (Some(other), Some(_)) => {
                return Err(Error::Configuration {
                    message: format!(
                        "stop_dir requires the global search strategy, got {other:?}"
                    ),
                });
            }
            (strategy, None) => strategy.unwrap_or_default(),
        };

        let discovered = if self.skip_meta {
            None
        } else {
            let meta_dir = match self.meta_search_dir {
                Some(dir) => dir,
                None => env::current_dir().map_err(|e| Error::Configuration {
                    message: format!("cannot determine working directory: {e}"),
                })?,
            };
            meta::discover(&meta_dir)?
        };

        let (meta_config_path, meta_options) = match discovered {
            Some(found) => (Some(found.path), found.options),
            None => (None, meta::MetaOptions::default()),
        };

        let module_name = self.module_name;
        let search_places = self
            .search_places
            .or(meta_options.search_places)
            .unwrap_or_else(|| default_search_places(&module_name));
        let global_search_places = self
            .global_search_places
            .or(meta_options.global_search_places)
            .unwrap_or_else(default_global_search_places);

        Ok(ExplorerOptions {
            strategy,
            search_places: substitute_name(search_places, &module_name),
            global_search_places: substitute_name(global_search_places, &module_name),
            meta_config_path,
            loaders: Arc::new(self.loaders.unwrap_or_default()),
            cache: self.cache.or(meta_options.cache).unwrap_or(true),
            ignore_empty_search_places: self
                .ignore_empty_search_places
                .or(meta_options.ignore_empty_search_places)
                .unwrap_or(true),
            merge_import_arrays: self
                .merge_import_arrays
                .or(meta_options.merge_import_arrays)
                .unwrap_or(true),
            package_prop: self
                .package_prop
                .unwrap_or_else(|| PackageProp::Key(module_name.clone())),
            // The walk compares absolutized directories, so the bound
            // must be absolutized the same way.
            stop_dir: self
                .stop_dir
                .map(|dir| crate::paths::absolutize(&dir))
                .transpose()?,
            transform: self.transform.unwrap_or_else(|| Arc::new(|result| Ok(result))),
            module_name,
        })
    }
}
