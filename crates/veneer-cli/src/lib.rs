//! Veneer command-line driver
//!
//! Loads `veneer.toml`, runs the generator against the configured type
//! metadata and writes the generated sources.

pub mod commands;
pub mod config;
pub mod output;

pub use commands::{CommandOptions, Summary};
pub use config::{ConfigError, VeneerConfig};
pub use output::OutputFormat;
