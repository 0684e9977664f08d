//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML file from the platform config
//! directory (or an explicit path), falls back to defaults when it does not
//! exist, and writes it back when asked.

pub mod config;
