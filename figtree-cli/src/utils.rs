//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including path resolution and output formatting.

use crate::error::CliError;
use clap::ValueEnum;
use figtree::FoundConfig;
use serde_json::json;
use std::env;
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // Verbosity fields also drive the logger in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Output format for resolved configuration.
    pub format: OutputFormat,
}

/// Output format for resolved configuration.
#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Resolve a search directory, using CWD if not specified.
pub fn resolve_search_dir(dir: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match dir {
        Some(d) => Ok(d),
        None => Ok(env::current_dir()?),
    }
}

/// Print a resolution result to stdout.
///
/// A hit is rendered as an object carrying the source file path, the
/// parsed configuration, and the empty flag. A miss prints nothing and
/// signals a semantic failure so the exit code distinguishes the cases.
pub fn print_result(
    result: Option<&FoundConfig>,
    global: &GlobalOptions,
) -> Result<(), CliError> {
    let Some(found) = result else {
        return Err(CliError::SemanticFailure(
            "no configuration found".to_string(),
        ));
    };

    let payload = json!({
        "filepath": found.filepath.display().to_string(),
        "config": found.config,
        "isEmpty": found.is_empty,
    });

    match global.format {
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&payload)
                .map_err(|e| CliError::Config(e.to_string()))?;
            println!("{rendered}");
        }
        OutputFormat::Yaml => {
            let rendered =
                serde_yaml::to_string(&payload).map_err(|e| CliError::Config(e.to_string()))?;
            print!("{rendered}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figtree::FoundConfig;
    use serde_json::json;

    #[test]
    fn test_print_result_miss_is_semantic_failure() {
        let global = GlobalOptions {
            verbose: false,
            quiet: false,
            format: OutputFormat::Json,
        };
        let err = print_result(None, &global).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_print_result_hit() {
        let global = GlobalOptions {
            verbose: false,
            quiet: false,
            format: OutputFormat::Json,
        };
        let found = FoundConfig {
            config: json!({"a": 1}),
            filepath: PathBuf::from("/tmp/.modrc"),
            is_empty: false,
        };
        assert!(print_result(Some(&found), &global).is_ok());
    }
}
