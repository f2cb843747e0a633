// tests/supervisor_lifecycle.rs

//! Process lifecycle behaviour: start, kill, restart, and the benign
//! already-exited case, driven with real child processes.

#![cfg(unix)]

mod common;

use std::error::Error;
use std::fs;
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::sleep;
use watchrun::exec::Supervisor;
use watchrun::project::Project;

use crate::common::write_script;

type TestResult = Result<(), Box<dyn Error>>;

/// Project dir `demoapp` whose "built binary" is the given script.
fn project_with_binary(body: &str) -> Result<(TempDir, Project), Box<dyn Error>> {
    let tmp = TempDir::new()?;
    let root = tmp.path().join("demoapp");
    fs::create_dir(&root)?;
    write_script(&root.join("demoapp"), body)?;

    let project = Project::from_root(root, None, None)?;
    Ok((tmp, project))
}

async fn wait_until_cleared(supervisor: &Supervisor) -> bool {
    for _ in 0..40 {
        if supervisor.running_pid().await.is_none() {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn start_then_kill_clears_the_instance() -> TestResult {
    let (_tmp, project) = project_with_binary("#!/bin/sh\nsleep 30\n")?;
    let supervisor = Supervisor::new(project);

    supervisor.start().await;
    sleep(Duration::from_millis(100)).await;
    assert!(supervisor.running_pid().await.is_some());

    supervisor.kill().await?;
    assert!(supervisor.running_pid().await.is_none());
    Ok(())
}

#[tokio::test]
async fn kill_without_instance_is_a_noop() -> TestResult {
    let (_tmp, project) = project_with_binary("#!/bin/sh\nexit 0\n")?;
    let supervisor = Supervisor::new(project);

    supervisor.kill().await?;
    Ok(())
}

#[tokio::test]
async fn self_exit_clears_instance_and_later_kill_succeeds() -> TestResult {
    let (_tmp, project) = project_with_binary("#!/bin/sh\nexit 0\n")?;
    let supervisor = Supervisor::new(project);

    supervisor.start().await;
    assert!(
        wait_until_cleared(&supervisor).await,
        "monitor should clear the slot after the process exits on its own"
    );

    // Killing an already-exited process is a no-op success, not an error.
    supervisor.kill().await?;
    Ok(())
}

#[tokio::test]
async fn restart_replaces_the_instance() -> TestResult {
    let (_tmp, project) = project_with_binary("#!/bin/sh\nsleep 30\n")?;
    let supervisor = Supervisor::new(project);

    supervisor.start().await;
    sleep(Duration::from_millis(100)).await;
    let first = supervisor.running_pid().await.expect("first instance");

    supervisor.restart().await?;
    sleep(Duration::from_millis(100)).await;
    let second = supervisor.running_pid().await.expect("second instance");
    assert_ne!(first, second, "restart must produce a fresh process");

    supervisor.kill().await?;
    Ok(())
}

#[tokio::test]
async fn spawn_failure_leaves_slot_empty_and_loop_alive() -> TestResult {
    // No binary in the project dir at all.
    let tmp = TempDir::new()?;
    let root = tmp.path().join("demoapp");
    fs::create_dir(&root)?;
    let supervisor = Supervisor::new(Project::from_root(root, None, None)?);

    supervisor.start().await;
    assert!(supervisor.running_pid().await.is_none());
    supervisor.kill().await?;
    Ok(())
}
