// src/exec/supervisor.rs

use std::io;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info, warn};

use crate::project::Project;

/// Owns the lifecycle of the spawned application process.
///
/// At most one instance of the project binary is alive at any time: the
/// instance slot holds zero or one [`RunningInstance`], and
/// [`restart`](Supervisor::restart) always kills before it starts.
///
/// Each spawned process is paired with a detached monitor task. The monitor
/// waits on the child and has exactly two jobs: clear the instance slot when
/// the process exits on its own, and carry out a kill request when one
/// arrives. Nothing is reported back to the event loop on plain exit.
pub struct Supervisor {
    project: Project,
    instance: Arc<Mutex<Option<RunningInstance>>>,
    generation: AtomicU64,
}

/// Handle to the currently running process.
///
/// Killing goes through the monitor task (which owns the [`Child`]); the
/// handle itself only carries the pid, a generation counter so a stale
/// monitor can never clear a newer instance, and the kill channel.
struct RunningInstance {
    pid: Option<u32>,
    generation: u64,
    kill_tx: oneshot::Sender<oneshot::Sender<KillOutcome>>,
}

enum KillOutcome {
    Killed,
    /// The termination signal bounced because the process had already
    /// exited on its own. Treated as success by the caller.
    AlreadyExited,
    Failed(io::Error),
}

impl Supervisor {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            instance: Arc::new(Mutex::new(None)),
            generation: AtomicU64::new(0),
        }
    }

    /// Spawn the project's built binary with inherited stdout/stderr.
    ///
    /// Returns once the process is launched; exit is observed only by the
    /// monitor task. A spawn failure is logged and leaves the instance slot
    /// empty rather than stopping the watch loop.
    ///
    /// Callers must ensure no instance is currently running; [`restart`]
    /// does this by killing first.
    ///
    /// [`restart`]: Supervisor::restart
    pub async fn start(&self) {
        let program = self.project.exec_path();
        info!(project = %self.project.name(), "starting process");

        let mut cmd = Command::new(&program);
        cmd.current_dir(self.project.root())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                warn!(program = %program, error = %err, "failed to start process");
                return;
            }
        };

        let pid = child.id();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let (kill_tx, kill_rx) = oneshot::channel();

        {
            let mut slot = self.instance.lock().await;
            *slot = Some(RunningInstance {
                pid,
                generation,
                kill_tx,
            });
        }

        tokio::spawn(monitor(
            child,
            generation,
            kill_rx,
            Arc::clone(&self.instance),
            self.project.name().to_string(),
        ));
    }

    /// Terminate the running instance, if any.
    ///
    /// - no instance → no-op success
    /// - signal delivered → instance cleared, success
    /// - process had already exited → instance cleared, success
    /// - any other signalling failure → error; the caller treats this as
    ///   fatal and halts the supervisor
    pub async fn kill(&self) -> Result<()> {
        let taken = self.instance.lock().await.take();
        let Some(instance) = taken else {
            return Ok(());
        };

        info!(project = %self.project.name(), pid = ?instance.pid, "killing process");

        let (reply_tx, reply_rx) = oneshot::channel();
        if instance.kill_tx.send(reply_tx).is_err() {
            // Monitor already finished: the process exited on its own.
            return Ok(());
        }

        match reply_rx.await {
            Ok(KillOutcome::Killed) | Ok(KillOutcome::AlreadyExited) | Err(_) => Ok(()),
            Ok(KillOutcome::Failed(err)) => Err(err).with_context(|| {
                format!(
                    "failed to signal running process of '{}'",
                    self.project.name()
                )
            }),
        }
    }

    /// Replace the running instance: kill synchronously, then start.
    ///
    /// Does not wait for the new process to be confirmed running beyond the
    /// spawn itself.
    pub async fn restart(&self) -> Result<()> {
        self.kill().await?;
        self.start().await;
        Ok(())
    }

    /// Pid of the current instance, if one is alive.
    pub async fn running_pid(&self) -> Option<u32> {
        self.instance.lock().await.as_ref().and_then(|i| i.pid)
    }
}

/// Detached per-process monitor.
///
/// Either the child exits on its own (slot cleared, generation-checked), or
/// a kill request arrives and the signal is sent from here, where the
/// [`Child`] lives.
async fn monitor(
    mut child: Child,
    generation: u64,
    mut kill_rx: oneshot::Receiver<oneshot::Sender<KillOutcome>>,
    slot: Arc<Mutex<Option<RunningInstance>>>,
    project_name: String,
) {
    tokio::select! {
        status = child.wait() => {
            match status {
                Ok(status) => {
                    debug!(project = %project_name, %status, "process exited on its own");
                }
                Err(err) => {
                    warn!(project = %project_name, error = %err, "waiting on process failed");
                }
            }

            let mut slot = slot.lock().await;
            if slot.as_ref().is_some_and(|i| i.generation == generation) {
                *slot = None;
            }
        }
        res = &mut kill_rx => {
            match res {
                Ok(reply) => {
                    // Only the signal send itself is classified; everything
                    // after it is plain cleanup.
                    let outcome = match child.start_kill() {
                        Ok(()) => {
                            let _ = child.wait().await;
                            KillOutcome::Killed
                        }
                        Err(err) if err.kind() == io::ErrorKind::InvalidInput => {
                            let _ = child.try_wait();
                            KillOutcome::AlreadyExited
                        }
                        Err(err) => KillOutcome::Failed(err),
                    };
                    let _ = reply.send(outcome);
                }
                Err(_) => {
                    // Instance handle dropped without a kill request; all
                    // that is left to do is reap the child.
                    let _ = child.wait().await;
                }
            }
        }
    }
}
