// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (pattern syntax, timing bounds). Use [`load_or_default`] for
/// the full treatment.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading config file at {path:?}"))?;

    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("parsing TOML config from {path:?}"))?;

    Ok(config)
}

/// Load and validate the configuration, falling back to built-in defaults
/// when the file does not exist.
///
/// This is the entry point the rest of the application uses. An absent file
/// is the normal case (`watchrun` works with zero configuration); a file
/// that exists but fails to parse or validate is a startup error.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();

    let config = if path.exists() {
        load_from_path(path)?
    } else {
        ConfigFile::default()
    };

    validate_config(&config)?;
    Ok(config)
}
