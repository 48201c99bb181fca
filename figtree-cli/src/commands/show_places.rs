//! Show-places command implementation.
//!
//! This module implements the `show-places` command, which prints the
//! resolved search-place list for a module, one place per line. Useful
//! for checking what a `search` invocation would probe, including any
//! overrides picked up from meta-configuration.

use crate::error::CliError;
use crate::utils::{resolve_search_dir, GlobalOptions};
use clap::Args;
use figtree::ExplorerSync;
use std::path::PathBuf;

/// Print the search places that would be probed.
#[derive(Args)]
pub struct ShowPlacesCommand {
    /// Module name to resolve search places for
    #[arg(value_name = "MODULE")]
    pub module_name: String,

    /// Directory the places would be resolved against (defaults to CWD)
    #[arg(long, value_name = "DIR")]
    pub from: Option<PathBuf>,

    /// Show the global search places instead of the per-directory ones
    #[arg(long)]
    pub global_places: bool,
}

impl ShowPlacesCommand {
    /// Execute the show-places command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let from = resolve_search_dir(self.from)?;

        let explorer = ExplorerSync::builder(&self.module_name)
            .with_meta_search_dir(from)
            .build_sync()?;
        let options = explorer.options();

        let places = if self.global_places {
            &options.global_search_places
        } else {
            &options.search_places
        };

        for place in places {
            println!("{place}");
        }

        if global.verbose {
            if let Some(meta_path) = &options.meta_config_path {
                eprintln!("meta configuration: {}", meta_path.display());
            }
        }

        Ok(())
    }
}
