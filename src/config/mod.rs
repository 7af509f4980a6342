//! Configuration management for livefft.
//!
//! Loads the TOML configuration from the user's config directory and turns it
//! into the initial waterfall parameters. Every setting has a default, so a
//! missing file is not an error.

pub mod file;

pub use file::{config_path, AudioConfig, DisplayConfig, LivefftConfig};
