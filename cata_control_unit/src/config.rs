//! TOML configuration loading with validation.
//!
//! Parses a [`LauncherConfig`] and bounds-checks it before anything is
//! constructed from it. Missing keys fall back to defaults; unknown
//! keys are rejected so a typo cannot silently disable a safety knob.

use std::path::Path;

use cata_common::config::LauncherConfig;
use thiserror::Error;

/// Configuration loading/validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("config I/O error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Parameter validation error.
    #[error("config validation: {0}")]
    Validation(String),
}

/// Load and validate the launcher configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LauncherConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("failed to read {}: {e}", path.display())))?;
    load_config_from_str(&raw)
}

/// Load config from a TOML string (also used by tests).
pub fn load_config_from_str(raw: &str) -> Result<LauncherConfig, ConfigError> {
    let config: LauncherConfig =
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate().map_err(ConfigError::Validation)?;
    Ok(config)
}

// ─── Tests ──────────────────────────────────────────────────────────
