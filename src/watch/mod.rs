// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Classifying changed paths against watch/ignore regex rules.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Debouncing bursts of changes into a single rebuild trigger.
//!
//! It does **not** build or restart anything; it only turns filesystem
//! noise into rebuild triggers for the runtime.

pub mod debounce;
pub mod filter;
pub mod watcher;

pub use debounce::Debouncer;
pub use filter::PathFilter;
pub use watcher::{WatcherHandle, spawn_watcher};
