//! First-run setup.
//!
//! Writes the commented default configuration so users have something to edit.

use anyhow::Context;
use std::path::Path;

use crate::config::config_path;

/// Embedded default configuration template.
pub const DEFAULT_CONFIG: &str = include_str!("../../environments/livefft.toml");

/// Writes the default config file unless one already exists.
///
/// Returns `true` when a new file was written.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory or file cannot be written
pub fn ensure_config() -> anyhow::Result<bool> {
    let path = config_path()?;
    let created = write_default_config(&path)?;
    if created {
        tracing::info!("Wrote default configuration to {}", path.display());
    }
    Ok(created)
}

/// Writes [`DEFAULT_CONFIG`] to `path`, creating parent directories.
/// Existing files are left alone.
///
/// # Errors
/// - If the directory or file cannot be created
pub fn write_default_config(path: &Path) -> anyhow::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}
