//! Parsing and validation of `ioplace.toml` run configuration files.
//!
//! A run configuration names the technology and design inputs, the output
//! and golden files, the placement parameters and the pin constraints of one
//! regression run. [`resolve_run`] turns it into absolute paths.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_run, ResolvedRun};
pub use types::*;
