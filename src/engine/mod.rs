// src/engine/mod.rs

//! Orchestration engine for watchrun.
//!
//! This module ties together:
//! - qualifying file-change events from the watcher
//! - the debounce timer's rebuild triggers
//! - build completion reports
//! - shutdown signals
//!
//! into the single event loop that drives rebuild-and-restart cycles.

pub mod runtime;

pub use runtime::{ChangeKind, LoopState, Runtime, RuntimeEvent, TriggerReason};
