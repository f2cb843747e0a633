// src/exec/mod.rs

//! Build and process execution layer.
//!
//! This module owns every interaction with the outside world's processes:
//!
//! - [`build`] invokes the external build tool and captures diagnostics.
//! - [`lock`] provides the named locks that keep builds for one project
//!   mutually exclusive.
//! - [`supervisor`] owns the lifecycle of the spawned application process:
//!   start, kill, restart.

pub mod build;
pub mod lock;
pub mod supervisor;

pub use build::{BuildOutcome, BuildRunner};
pub use lock::NamedLocks;
pub use supervisor::Supervisor;
