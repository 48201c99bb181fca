//! Main entry point for the figtree CLI.
//!
//! This is the command-line interface for the figtree configuration
//! discovery engine. It provides commands for resolving configuration:
//! - `search`: Search a directory hierarchy for configuration
//! - `load`: Load one specific configuration file
//! - `show-places`: Print the resolved search-place list

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _logger = figtree::init_logger(cli.verbose, cli.quiet);

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        format: cli.format,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Search(cmd) => cmd.execute(&global),
        cli::Command::Load(cmd) => cmd.execute(&global),
        cli::Command::ShowPlaces(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
