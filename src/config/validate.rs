// src/config/validate.rs

use anyhow::{Context, Result, anyhow};
use regex::Regex;

use crate::config::model::ConfigFile;

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - every `watch` and `ignore` pattern compiles as a regular expression
/// - `debounce_ms >= 1`
/// - `build.tool` is non-empty
///
/// A malformed pattern is rejected here, at startup, rather than being
/// silently skipped at match time: a typo in a watch pattern would otherwise
/// disable watching with no visible symptom.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_patterns(&cfg.watch.watch, "watch")?;
    validate_patterns(&cfg.watch.ignore, "ignore")?;

    if cfg.watch.debounce_ms == 0 {
        return Err(anyhow!("[watch].debounce_ms must be >= 1 (got 0)"));
    }

    if cfg.build.tool.trim().is_empty() {
        return Err(anyhow!("[build].tool must not be empty"));
    }

    Ok(())
}

fn validate_patterns(patterns: &[String], kind: &str) -> Result<()> {
    for pat in patterns {
        Regex::new(pat).with_context(|| format!("invalid [watch].{kind} pattern: {pat}"))?;
    }
    Ok(())
}
