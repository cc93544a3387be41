//! Parsing and validation of `lacquer.toml` plugin configuration files.
//!
//! This crate reads the plugin configuration and produces a strongly-typed
//! [`PluginConfig`]: module filter patterns, cache layout, source-map and
//! preprocessor settings, and the pass-through options handed to the style
//! extractor untouched.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, validate_config, CONFIG_FILE};
pub use types::*;
