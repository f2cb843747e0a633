// src/engine/runtime.rs

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::exec::{BuildOutcome, BuildRunner, Supervisor};
use crate::project::Project;
use crate::watch::Debouncer;

/// What kind of filesystem change a qualifying event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    Write,
    Remove,
    Rename,
    Chmod,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Write => f.write_str("write"),
            Self::Remove => f.write_str("remove"),
            Self::Rename => f.write_str("rename"),
            Self::Chmod => f.write_str("chmod"),
        }
    }
}

/// Why a rebuild was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// The unconditional build performed once at startup.
    Startup,
    /// The debounce window elapsed after one or more file changes.
    FileChange,
}

/// Events sent into the runtime from the watcher, the debounce timer, build
/// tasks, and the signal handler.
#[derive(Debug)]
pub enum RuntimeEvent {
    /// A change that passed the watch filter and failed the ignore filter.
    FileChanged { path: PathBuf, kind: ChangeKind },
    /// The debounce timer fired (or startup seeded an initial build).
    BuildRequested { reason: TriggerReason },
    /// A spawned build task finished.
    BuildFinished { outcome: BuildOutcome },
    ShutdownRequested,
}

/// Where the rebuild pipeline currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No change seen, no build pending.
    Idle,
    /// A rebuild is scheduled but the quiescence window has not elapsed.
    BuildPending,
    /// The build tool is running.
    Building,
    /// The last build succeeded and its binary was (re)started.
    Running,
}

/// The orchestration runtime.
///
/// Consumes [`RuntimeEvent`]s from a single channel and drives the
/// watch→debounce→build→restart cycle:
///
/// - a qualifying change re-arms the debouncer ([`LoopState::BuildPending`])
/// - the timer firing launches a build task ([`LoopState::Building`]); the
///   build itself runs in a spawned task so the loop stays reactive, and
///   builds for this project are serialized inside [`BuildRunner`]
/// - on success the supervisor kills the old instance and starts the new one
///   ([`LoopState::Running`]); on failure the diagnostics are logged, any
///   running instance is left untouched, and the loop returns to
///   [`LoopState::Idle`]
///
/// In-flight builds are never cancelled: a build started before a newer
/// change always runs to completion and its restart is still applied. The
/// next debounce cycle catches up.
pub struct Runtime {
    project: Project,
    state: LoopState,
    debouncer: Debouncer,
    builder: BuildRunner,
    supervisor: Supervisor,
    events_rx: mpsc::Receiver<RuntimeEvent>,
    /// Cloned into build tasks so they can report completion.
    events_tx: mpsc::Sender<RuntimeEvent>,
}

impl Runtime {
    pub fn new(
        project: Project,
        debouncer: Debouncer,
        builder: BuildRunner,
        supervisor: Supervisor,
        events_rx: mpsc::Receiver<RuntimeEvent>,
        events_tx: mpsc::Sender<RuntimeEvent>,
    ) -> Self {
        Self {
            project,
            state: LoopState::Idle,
            debouncer,
            builder,
            supervisor,
            events_rx,
            events_tx,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Main event loop.
    ///
    /// Runs until a shutdown is requested or a fatal error occurs. The only
    /// fatal error in the core is a failure to signal a live process during
    /// kill; build failures and spawn failures keep the loop alive.
    pub async fn run(mut self) -> Result<()> {
        info!(project = %self.project.name(), "watchrun runtime started");

        while let Some(event) = self.events_rx.recv().await {
            debug!(?event, "runtime received event");

            let keep_running = match event {
                RuntimeEvent::FileChanged { path, kind } => {
                    self.handle_file_changed(path, kind).await
                }
                RuntimeEvent::BuildRequested { reason } => {
                    self.handle_build_requested(reason).await
                }
                RuntimeEvent::BuildFinished { outcome } => {
                    self.handle_build_finished(outcome).await?
                }
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested, stopping runtime");
                    self.supervisor.kill().await?;
                    false
                }
            };

            if !keep_running {
                break;
            }
        }

        info!("watchrun runtime exiting");
        Ok(())
    }

    /// A qualifying change arrived: log it and (re-)arm the debounce timer.
    ///
    /// This is the `Idle → BuildPending`, `BuildPending → BuildPending`
    /// (timer reset) and `Running → BuildPending` transition, including the
    /// case where a previous build's process is still alive.
    async fn handle_file_changed(&mut self, path: PathBuf, kind: ChangeKind) -> bool {
        info!(kind = %kind, path = %path.display(), "file changed");
        self.state = LoopState::BuildPending;
        self.debouncer.notify().await;
        true
    }

    /// The quiescence window elapsed (or startup seeded a build): launch the
    /// build in its own task so the loop stays reactive to further changes.
    async fn handle_build_requested(&mut self, reason: TriggerReason) -> bool {
        debug!(?reason, "rebuild due");
        self.debouncer.clear().await;
        self.state = LoopState::Building;

        let builder = self.builder.clone();
        let project = self.project.clone();
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = builder.build(&project).await;
            let _ = events_tx.send(RuntimeEvent::BuildFinished { outcome }).await;
        });

        true
    }

    /// A build finished: restart on success, report diagnostics on failure.
    ///
    /// If a newer change already moved the state back to `BuildPending`
    /// while the build ran, that state is preserved; the finished build's
    /// outcome must not mask the pending cycle.
    async fn handle_build_finished(&mut self, outcome: BuildOutcome) -> Result<bool> {
        match outcome {
            BuildOutcome::Success => {
                self.supervisor.restart().await?;
                if self.state == LoopState::Building {
                    self.state = LoopState::Running;
                }
            }
            BuildOutcome::Failed(diagnostics) => {
                warn!(
                    project = %self.project.name(),
                    "build failed:\n{}",
                    diagnostics.trim_end()
                );
                if self.state == LoopState::Building {
                    self.state = LoopState::Idle;
                }
            }
        }

        Ok(true)
    }
}
