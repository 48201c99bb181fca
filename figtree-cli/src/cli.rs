//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{LoadCommand, SearchCommand, ShowPlacesCommand};
use crate::utils::OutputFormat;
use clap::{Parser, Subcommand};

/// Command-line tool for discovering and loading module configuration.
#[derive(Parser)]
#[command(name = "figtree")]
#[command(version, about = "Discover and load module configuration", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Output format for resolved configuration
    #[arg(
        long,
        value_enum,
        default_value = "json",
        global = true,
        env = "FIGTREE_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Search a directory hierarchy for configuration
    Search(SearchCommand),

    /// Load one specific configuration file
    Load(LoadCommand),

    /// Print the search places that would be probed
    ShowPlaces(ShowPlacesCommand),
}
