//! Search command implementation.
//!
//! This module implements the `search` command, which walks a directory
//! hierarchy probing the configured search places and prints the first
//! non-empty configuration found.

use crate::error::CliError;
use crate::utils::{print_result, resolve_search_dir, GlobalOptions};
use clap::Args;
use figtree::{ExplorerSync, SearchStrategy};
use std::path::{Path, PathBuf};

/// Search a directory hierarchy for configuration.
#[derive(Args)]
pub struct SearchCommand {
    /// Module name to search configuration for
    #[arg(value_name = "MODULE")]
    pub module_name: String,

    /// Directory to start the search from (defaults to CWD)
    #[arg(long, value_name = "DIR")]
    pub from: Option<PathBuf>,

    /// Search strategy (none, project, global)
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<String>,

    /// Directory at which an upward search stops
    #[arg(long, value_name = "DIR")]
    pub stop_dir: Option<PathBuf>,

    /// Probe these places instead of the defaults ({name} expands to MODULE)
    #[arg(long, value_name = "PLACE")]
    pub search_place: Vec<String>,

    /// Disable result caching
    #[arg(long)]
    pub no_cache: bool,

    /// Treat empty configuration files as matches instead of skipping them
    #[arg(long)]
    pub accept_empty: bool,
}

impl SearchCommand {
    /// Execute the search command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let from = resolve_search_dir(self.from.clone())?;
        let explorer = self.build_explorer(&from)?;

        let result = explorer.search(&from)?;
        print_result(result.as_ref(), global)
    }

    fn build_explorer(&self, from: &Path) -> Result<ExplorerSync, CliError> {
        // Meta-configuration is discovered relative to the search start,
        // not the process CWD.
        let mut builder =
            ExplorerSync::builder(&self.module_name).with_meta_search_dir(from.to_path_buf());

        if let Some(ref name) = self.strategy {
            let strategy =
                SearchStrategy::parse(name).map_err(CliError::InvalidArguments)?;
            builder = builder.with_strategy(strategy);
        }

        if let Some(ref dir) = self.stop_dir {
            builder = builder.with_stop_dir(dir.clone());
        }

        if !self.search_place.is_empty() {
            builder = builder.with_search_places(self.search_place.clone());
        }

        if self.no_cache {
            builder = builder.with_cache(false);
        }

        if self.accept_empty {
            builder = builder.with_ignore_empty_search_places(false);
        }

        builder.build_sync().map_err(CliError::from)
    }
}
