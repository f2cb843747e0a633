// src/exec/build.rs

use std::collections::BTreeMap;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::exec::lock::NamedLocks;
use crate::project::Project;

/// Result of one build-tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    /// Non-zero exit (or failure to launch the tool at all), with whatever
    /// the tool wrote to stderr as a single diagnostic string.
    Failed(String),
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Success)
    }
}

/// Invokes the external build tool and captures its diagnostics.
///
/// Builds for the same project name are serialized through [`NamedLocks`]:
/// at most one build runs at a time, and a build requested while another is
/// in flight waits its turn and then still runs. Coalescing of triggers is
/// the debouncer's job, not this layer's.
#[derive(Clone)]
pub struct BuildRunner {
    tool: String,
    env: BTreeMap<String, String>,
    locks: NamedLocks,
}

impl BuildRunner {
    /// `env` is applied on top of the inherited environment for the build
    /// process only (the usual entry disables the tool's garbage collector
    /// during compilation).
    pub fn new(tool: impl Into<String>, env: BTreeMap<String, String>) -> Self {
        Self {
            tool: tool.into(),
            env,
            locks: NamedLocks::new(),
        }
    }

    /// Compile the project, returning success or captured diagnostics.
    ///
    /// stderr is collected, not streamed; stdout is discarded. The named
    /// lock guard is scoped to this function, so it is released on every
    /// exit path.
    pub async fn build(&self, project: &Project) -> BuildOutcome {
        let lock = self.locks.entry(project.name()).await;
        let _guard = lock.lock().await;

        info!(project = %project.name(), "build started");

        let mut cmd = Command::new(&self.tool);
        cmd.arg("build").arg("-o").arg(project.binary_name());
        if let Some(tags) = project.build_tags() {
            cmd.arg("-tags").arg(tags);
        }
        cmd.current_dir(project.root())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(err) => {
                warn!(tool = %self.tool, error = %err, "failed to launch build tool");
                return BuildOutcome::Failed(format!(
                    "failed to launch build tool '{}': {err}",
                    self.tool
                ));
            }
        };

        if output.status.success() {
            debug!(project = %project.name(), "build succeeded");
            BuildOutcome::Success
        } else {
            let diagnostics = String::from_utf8_lossy(&output.stderr).into_owned();
            BuildOutcome::Failed(diagnostics)
        }
    }
}
