//! Meta-configuration discovery.
//!
//! The engine itself can be configured by a project: a fixed, hardcoded
//! list of meta search places is probed once at engine construction
//! (never on the hot search/load path) with a dedicated non-caching,
//! strategy-`none` lookup. A discovered meta-configuration may override
//! the search-place lists and behavior flags; it may never override
//! loaders or the search strategy.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::explorer_sync::ExplorerSync;
use crate::loaders::LoaderRegistry;
use crate::options::ExplorerOptions;
use crate::value::PackageProp;
use crate::walk::SearchStrategy;

/// The module name the engine uses for its own configuration.
pub const META_MODULE_NAME: &str = "figtree";

/// The fixed meta search places. Not user-configurable.
fn meta_search_places() -> Vec<String> {
    let mut places = vec!["package.json".to_string(), "package.yaml".to_string()];
    places.push(format!(".{META_MODULE_NAME}rc"));
    for ext in ["json", "yaml", "yml", "toml"] {
        places.push(format!(".{META_MODULE_NAME}rc.{ext}"));
    }
    for ext in ["json", "yaml", "yml", "toml"] {
        places.push(format!(".config/{META_MODULE_NAME}.{ext}"));
    }
    places
}

/// Option overrides parsed from a meta-configuration file.
///
/// Unknown fields are tolerated; the two forbidden knobs are captured
/// so their presence can be rejected explicitly.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MetaOptions {
    pub search_places: Option<Vec<String>>,
    pub global_search_places: Option<Vec<String>>,
    pub cache: Option<bool>,
    pub ignore_empty_search_places: Option<bool>,
    pub merge_import_arrays: Option<bool>,
    loaders: Option<Value>,
    search_strategy: Option<Value>,
}

impl MetaOptions {
    fn validate(&self, path: &Path) -> Result<()> {
        if self.loaders.is_some() {
            return Err(Error::Configuration {
                message: format!(
                    "loaders cannot be overridden by the meta configuration at {}",
                    path.display()
                ),
            });
        }
        if self.search_strategy.is_some() {
            return Err(Error::Configuration {
                message: format!(
                    "the search strategy cannot be overridden by the meta configuration at {}",
                    path.display()
                ),
            });
        }
        Ok(())
    }
}

/// A discovered and validated meta-configuration.
#[derive(Debug)]
pub(crate) struct DiscoveredMeta {
    /// The meta-configuration file.
    pub path: PathBuf,
    /// Its parsed option overrides.
    pub options: MetaOptions,
}

/// Probe the meta search places under `from` once.
///
/// # Errors
///
/// Propagates parse failures, and rejects meta files that declare
/// forbidden options or do not parse as options at all.
pub(crate) fn discover(from: &Path) -> Result<Option<DiscoveredMeta>> {
    let lookup = ExplorerSync::from_options(ExplorerOptions {
        module_name: META_MODULE_NAME.to_string(),
        strategy: SearchStrategy::None,
        search_places: meta_search_places(),
        global_search_places: Vec::new(),
        meta_config_path: None,
        loaders: Arc::new(LoaderRegistry::defaults()),
        cache: false,
        ignore_empty_search_places: true,
        merge_import_arrays: true,
        package_prop: PackageProp::Key(META_MODULE_NAME.to_string()),
        stop_dir: None,
        transform: Arc::new(|result| Ok(result)),
    });

    let Some(found) = lookup.search(from)? else {
        return Ok(None);
    };
    log::debug!("meta configuration found at {}", found.filepath.display());

    let options: MetaOptions =
        serde_json::from_value(found.config).map_err(|e| Error::Configuration {
            message: format!(
                "invalid meta configuration at {}: {e}",
                found.filepath.display()
            ),
        })?;
    options.validate(&found.filepath)?;

    Ok(Some(DiscoveredMeta {
        path: found.filepath,
        options,
    }))
}
