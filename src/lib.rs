// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod project;
pub mod watch;

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::cli::CliArgs;
use crate::config::load_or_default;
use crate::engine::{Runtime, RuntimeEvent, TriggerReason};
use crate::exec::{BuildRunner, Supervisor};
use crate::project::Project;
use crate::watch::{Debouncer, PathFilter, spawn_watcher};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (optional `Watchrun.toml`, validated)
/// - project discovery from the invocation directory
/// - the file watcher (its failure is fatal at startup)
/// - the unconditional initial build
/// - Ctrl-C handling
/// - the runtime event loop
pub async fn run(args: CliArgs) -> Result<()> {
    let root = env::current_dir().context("determining current working directory")?;
    let cfg = load_or_default(root.join(&args.config))?;

    let build_tags = args.tags.clone().or_else(|| cfg.project.build_tags.clone());
    let project = Project::from_root(root, cfg.project.name.clone(), build_tags)?;

    let filter = PathFilter::new(&cfg.watch.watch, &cfg.watch.ignore);

    // Unified event channel into the runtime.
    let (events_tx, events_rx) = mpsc::channel::<RuntimeEvent>(64);

    // The watch subscription comes first: if it cannot be established there
    // is nothing to supervise and startup fails before any build runs.
    let _watcher_handle =
        spawn_watcher(project.root().to_path_buf(), filter, events_tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = events_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    // One unconditional build+start establishes the first running instance.
    // Seeded ahead of any watcher traffic so it is processed first.
    events_tx
        .send(RuntimeEvent::BuildRequested {
            reason: TriggerReason::Startup,
        })
        .await?;

    let debouncer = Debouncer::new(
        Duration::from_millis(cfg.watch.debounce_ms),
        events_tx.clone(),
    );
    let builder = BuildRunner::new(cfg.build.tool.clone(), cfg.build.env.clone());
    let supervisor = Supervisor::new(project.clone());

    let runtime = Runtime::new(project, debouncer, builder, supervisor, events_rx, events_tx);
    runtime.run().await
}
