// src/errors.rs

//! Crate-wide error aliases.
//!
//! A thin wrapper around `anyhow`; gives the crate a single place to grow
//! more structured error types if they ever become necessary.

pub use anyhow::{Error, Result};
