//! Format loaders and the extension-based loader registry.
//!
//! A loader turns the raw text of a configuration file into a parsed
//! [`Value`]. The registry maps file extensions to loaders, with a
//! dedicated slot for extension-less filenames and an optional default
//! fallback. The registry is assembled once at engine construction and
//! never mutated afterwards.
//!
//! Loaders report failures through [`LoaderError`]; the engine annotates
//! them with the offending file path before propagating.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::error::{Error, Result};

/// A parse failure reported by a loader.
///
/// Carries only a message; the engine adds the file path.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LoaderError {
    /// The loader's description of the failure.
    pub message: String,
}

impl LoaderError {
    /// Create a loader error from anything displayable.
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// A pluggable configuration-file parser.
///
/// Implementors provide the synchronous [`Loader::load`]; the
/// asynchronous variant defaults to delegating to it, and only loaders
/// that genuinely suspend need to override it.
///
/// # Examples
///
/// ```
/// use figtree::loaders::{Loader, LoaderError};
/// use serde_json::Value;
/// use std::path::Path;
///
/// struct UpperLoader;
///
/// impl Loader for UpperLoader {
///     fn load(&self, _path: &Path, content: &str) -> Result<Value, LoaderError> {
///         Ok(Value::String(content.to_uppercase()))
///     }
/// }
/// ```
#[async_trait]
pub trait Loader: Send + Sync {
    /// Parse raw file content into a value.
    ///
    /// # Errors
    ///
    /// Returns a [`LoaderError`] when the content is invalid for the
    /// loader's format.
    fn load(&self, path: &Path, content: &str) -> std::result::Result<Value, LoaderError>;

    /// Asynchronous variant of [`Loader::load`].
    ///
    /// # Errors
    ///
    /// Returns a [`LoaderError`] when the content is invalid for the
    /// loader's format.
    async fn load_async(
        &self,
        path: &Path,
        content: &str,
    ) -> std::result::Result<Value, LoaderError> {
        self.load(path, content)
    }
}

/// Loader for JSON files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl Loader for JsonLoader {
    fn load(&self, _path: &Path, content: &str) -> std::result::Result<Value, LoaderError> {
        serde_json::from_str(content).map_err(LoaderError::new)
    }
}

/// Loader for YAML files.
///
/// Also serves extension-less files by default: YAML is a superset of
/// JSON, so `.{name}rc` files written in either format parse here.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlLoader;

impl Loader for YamlLoader {
    fn load(&self, _path: &Path, content: &str) -> std::result::Result<Value, LoaderError> {
        let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(LoaderError::new)?;
        serde_json::to_value(value).map_err(LoaderError::new)
    }
}

/// Loader for TOML files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlLoader;

impl Loader for TomlLoader {
    fn load(&self, _path: &Path, content: &str) -> std::result::Result<Value, LoaderError> {
        let value: toml::Value = toml::from_str(content).map_err(LoaderError::new)?;
        serde_json::to_value(value).map_err(LoaderError::new)
    }
}

/// Extension-keyed table of loaders.
///
/// Lookup order for a file: exact extension match, then the `no_ext`
/// slot for extension-less names, then the `default` fallback. A file
/// whose extension matches none of these is a fatal
/// [`Error::MissingLoader`].
///
/// # Examples
///
/// ```
/// use figtree::loaders::{JsonLoader, LoaderRegistry};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let registry = LoaderRegistry::defaults().with_loader("conf", Arc::new(JsonLoader));
/// assert!(registry.for_path(Path::new("app.conf")).is_ok());
/// assert!(registry.for_path(Path::new("app.ini")).is_err());
/// ```
#[derive(Clone)]
pub struct LoaderRegistry {
    by_extension: HashMap<String, Arc<dyn Loader>>,
    no_ext: Arc<dyn Loader>,
    default: Option<Arc<dyn Loader>>,
}

impl LoaderRegistry {
    /// The built-in registry: JSON, YAML (`yaml`/`yml`), and TOML, with
    /// YAML serving extension-less files.
    #[must_use]
    pub fn defaults() -> Self {
        let mut by_extension: HashMap<String, Arc<dyn Loader>> = HashMap::new();
        by_extension.insert("json".to_string(), Arc::new(JsonLoader));
        by_extension.insert("yaml".to_string(), Arc::new(YamlLoader));
        by_extension.insert("yml".to_string(), Arc::new(YamlLoader));
        by_extension.insert("toml".to_string(), Arc::new(TomlLoader));
        Self {
            by_extension,
            no_ext: Arc::new(YamlLoader),
            default: None,
        }
    }

    /// Register (or replace) the loader for an extension.
    #[must_use]
    pub fn with_loader(mut self, extension: &str, loader: Arc<dyn Loader>) -> Self {
        self.by_extension
            .insert(extension.to_ascii_lowercase(), loader);
        self
    }

    /// Replace the loader used for extension-less filenames.
    #[must_use]
    pub fn with_no_ext(mut self, loader: Arc<dyn Loader>) -> Self {
        self.no_ext = loader;
        self
    }

    /// Set a fallback loader for extensions with no registered entry.
    #[must_use]
    pub fn with_default(mut self, loader: Arc<dyn Loader>) -> Self {
        self.default = Some(loader);
        self
    }

    /// Resolve the loader responsible for a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLoader`] when no registered, no-extension,
    /// or default loader applies.
    pub fn for_path(&self, path: &Path) -> Result<Arc<dyn Loader>> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

        match extension {
            None => Ok(Arc::clone(&self.no_ext)),
            Some(ext) => {
                if let Some(loader) = self.by_extension.get(&ext) {
                    return Ok(Arc::clone(loader));
                }
                if let Some(default) = &self.default {
                    return Ok(Arc::clone(default));
                }
                Err(Error::MissingLoader {
                    path: path.to_path_buf(),
                    extension: ext,
                })
            }
        }
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}

impl fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut extensions: Vec<&str> = self.by_extension.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        f.debug_struct("LoaderRegistry")
            .field("extensions", &extensions)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}
