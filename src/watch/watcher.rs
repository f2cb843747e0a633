// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::{ChangeKind, RuntimeEvent};
use crate::watch::filter::PathFilter;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher observing `root` recursively.
///
/// Every notify event is forwarded into the async world, classified into a
/// [`ChangeKind`], and run through the [`PathFilter`]; qualifying changes
/// are sent to the runtime as [`RuntimeEvent::FileChanged`].
///
/// Failure to establish the subscription (permissions, missing directory)
/// is returned as an error; the caller treats it as fatal.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    filter: PathFilter,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let filter = Arc::new(filter);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // Tracing is unavailable inside the notify callback thread.
                    eprintln!("watchrun: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("watchrun: file watch error: {err}");
            }
        },
        Config::default(),
    )
    .context("creating filesystem watcher")?;

    watcher
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("watching directory {root:?}"))?;

    info!("file watcher started on {:?}", root);

    // Async task that consumes notify events and forwards qualifying changes.
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!("received notify event: {:?}", event);

            let Some(kind) = classify(&event.kind) else {
                continue;
            };

            for path in event.paths {
                let path_str = path.to_string_lossy();
                if !filter.qualifies(&path_str) {
                    debug!(path = %path_str, "change filtered out");
                    continue;
                }

                if let Err(err) = runtime_tx
                    .send(RuntimeEvent::FileChanged { path, kind })
                    .await
                {
                    warn!("failed to send FileChanged to runtime: {err}");
                    // Runtime channel closed; nothing left to forward to.
                    return;
                }
            }
        }

        debug!("file watcher loop ended");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Map a notify event kind onto the change kinds the runtime reports.
///
/// Access events carry no content change and are dropped here.
fn classify(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Create),
        EventKind::Remove(_) => Some(ChangeKind::Remove),
        EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeKind::Rename),
        EventKind::Modify(ModifyKind::Metadata(_)) => Some(ChangeKind::Chmod),
        EventKind::Modify(_) => Some(ChangeKind::Write),
        _ => None,
    }
}
