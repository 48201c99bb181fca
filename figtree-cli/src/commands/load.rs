//! Load command implementation.
//!
//! This module implements the `load` command, which loads a single
//! configuration file through the loader registry, resolving any
//! `$import` directives.

use crate::error::CliError;
use crate::utils::{print_result, GlobalOptions};
use clap::Args;
use figtree::ExplorerSync;
use std::path::PathBuf;

/// Load one specific configuration file.
#[derive(Args)]
pub struct LoadCommand {
    /// Module name (drives package-prop extraction for package files)
    #[arg(value_name = "MODULE")]
    pub module_name: String,

    /// Path to the configuration file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Keep arrays from the importing file instead of merging with imports
    #[arg(long)]
    pub no_merge_arrays: bool,
}

impl LoadCommand {
    /// Execute the load command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut builder = ExplorerSync::builder(&self.module_name).without_meta_config();

        if self.no_merge_arrays {
            builder = builder.with_merge_import_arrays(false);
        }

        let explorer = builder.build_sync()?;
        let result = explorer.load(&self.file)?;
        print_result(result.as_ref(), global)
    }
}
