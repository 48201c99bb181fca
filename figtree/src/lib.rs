#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # figtree
//!
//! A library for discovering and loading hierarchical configuration
//! files.
//!
//! figtree resolves application configuration by searching a directory
//! hierarchy (or a single directory, or a set of global locations) for
//! configuration files in multiple formats, parsing them through
//! pluggable loaders, merging `$import`-ed sub-configurations, and
//! caching results for repeated lookups.
//!
//! ## Core Types
//!
//! - [`Explorer`] and [`ExplorerSync`]: the concurrent and blocking
//!   engines
//! - [`ExplorerBuilder`]: option resolution and engine construction
//! - [`FoundConfig`]: a discovered configuration with its source path
//! - [`LoaderRegistry`] and [`Loader`]: the pluggable format parsers
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```no_run
//! use figtree::ExplorerSync;
//!
//! let explorer = ExplorerSync::builder("myapp").build_sync().unwrap();
//!
//! match explorer.search(".").unwrap() {
//!     Some(found) => println!("{}: {}", found.filepath.display(), found.config),
//!     None => println!("no configuration found"),
//! }
//! ```

pub mod error;
pub mod explorer;
pub mod explorer_sync;
pub mod import;
pub mod loaders;
pub mod logging;
pub mod merge;
mod meta;
pub mod options;
pub mod paths;
pub mod result;
pub mod value;
pub mod walk;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use explorer::Explorer;
pub use explorer_sync::ExplorerSync;
pub use loaders::{JsonLoader, Loader, LoaderError, LoaderRegistry, TomlLoader, YamlLoader};
pub use logging::{init_logger, LogLevel, Logger};
pub use merge::{merge_all, merge_into, MergeOptions};
pub use options::{ExplorerBuilder, ExplorerOptions, Transform};
pub use result::FoundConfig;
pub use value::PackageProp;
pub use walk::{DirectoryCandidate, DirectoryWalk, SearchStrategy};
