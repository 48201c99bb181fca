//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `search`: Search a directory hierarchy for configuration
//! - `load`: Load one specific configuration file
//! - `show_places`: Print the resolved search-place list

pub mod load;
pub mod search;
pub mod show_places;

pub use load::LoadCommand;
pub use search::SearchCommand;
pub use show_places::ShowPlacesCommand;
