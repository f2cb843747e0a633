// src/config/mod.rs

//! Configuration loading and validation for watchrun.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load an optional config file from the project root (`loader.rs`).
//! - Validate patterns and timing parameters up front (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_path, load_or_default};
pub use model::{BuildSection, ConfigFile, ProjectSection, WatchSection};
pub use validate::validate_config;
