// tests/watch_loop.rs

//! End-to-end behaviour of the watch→debounce→build→restart loop, with a
//! real filesystem watcher and a fake build tool that "compiles" by
//! emitting a runnable script.

#![cfg(unix)]

mod common;

use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep, timeout};
use watchrun::engine::{Runtime, RuntimeEvent};
use watchrun::exec::{BuildRunner, Supervisor};
use watchrun::project::Project;
use watchrun::watch::{Debouncer, PathFilter, spawn_watcher};

use crate::common::{init_tracing, write_script};

type TestResult = Result<(), Box<dyn Error>>;

const DEBOUNCE: Duration = Duration::from_millis(200);

struct Loop {
    _tmp: TempDir,
    root: PathBuf,
    events_tx: mpsc::Sender<RuntimeEvent>,
    runtime: tokio::task::JoinHandle<anyhow::Result<()>>,
}

/// Wire up a full loop over a temp project named `proj`.
///
/// The fake tool appends its arguments to `build.log`; if a `.fail` marker
/// exists it prints a diagnostic and exits non-zero, otherwise it writes a
/// `proj` script that logs `started` to `run.log` and sleeps.
fn start_loop() -> Result<Loop, Box<dyn Error>> {
    init_tracing();

    let tmp = TempDir::new()?;
    let root = tmp.path().join("proj");
    fs::create_dir(&root)?;

    let tool = tmp.path().join("fake-go");
    write_script(
        &tool,
        "#!/bin/sh\n\
         echo \"$@\" >> build.log\n\
         if [ -f .fail ]; then\n\
         \techo \"syntax error line 4\" >&2\n\
         \texit 1\n\
         fi\n\
         printf '#!/bin/sh\\necho started >> run.log\\nsleep 30\\n' > proj\n\
         chmod +x proj\n\
         exit 0\n",
    )?;

    let project = Project::from_root(root.clone(), None, None)?;
    let filter = PathFilter::new(&[r"\.go$".to_string()], &[r"\.md$".to_string()]);

    let (events_tx, events_rx) = mpsc::channel(64);
    let watcher = spawn_watcher(root.clone(), filter, events_tx.clone())?;

    let debouncer = Debouncer::new(DEBOUNCE, events_tx.clone());
    let builder = BuildRunner::new(tool.to_string_lossy().into_owned(), BTreeMap::new());
    let supervisor = Supervisor::new(project.clone());

    let runtime = Runtime::new(
        project,
        debouncer,
        builder,
        supervisor,
        events_rx,
        events_tx.clone(),
    );
    let runtime = tokio::spawn(async move {
        let _watcher = watcher; // keep the subscription alive for the loop's lifetime
        runtime.run().await
    });

    Ok(Loop {
        _tmp: tmp,
        root,
        events_tx,
        runtime,
    })
}

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path)
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

/// Poll until `path` holds `expected` lines, then hold for a moment to
/// catch spurious extra builds/restarts.
async fn wait_for_lines(path: &Path, expected: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if line_count(path) == expected {
            sleep(Duration::from_millis(400)).await;
            return line_count(path) == expected;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn loop_builds_once_per_burst_and_skips_ignored_files() -> TestResult {
    let harness = start_loop()?;
    let build_log = harness.root.join("build.log");
    let run_log = harness.root.join("run.log");

    // Let the subscription settle before generating traffic.
    sleep(Duration::from_millis(300)).await;

    // An ignored file must not trigger anything.
    fs::write(harness.root.join("README.md"), "# readme")?;
    sleep(Duration::from_millis(600)).await;
    assert_eq!(line_count(&build_log), 0, "ignored file triggered a build");

    // A watched file triggers exactly one build, then one process start.
    fs::write(harness.root.join("main.go"), "package main")?;
    assert!(wait_for_lines(&build_log, 1).await, "expected one build");
    assert!(wait_for_lines(&run_log, 1).await, "expected one start");

    // Two rapid writes inside one quiescence window: one more build, one
    // more restart.
    fs::write(harness.root.join("main.go"), "package main // a")?;
    sleep(Duration::from_millis(50)).await;
    fs::write(harness.root.join("main.go"), "package main // b")?;
    assert!(
        wait_for_lines(&build_log, 2).await,
        "rapid writes must coalesce into one build"
    );
    assert!(wait_for_lines(&run_log, 2).await, "expected one restart");

    // A failing build produces no restart; the running instance stays.
    fs::write(harness.root.join(".fail"), "")?;
    fs::write(harness.root.join("main.go"), "package main // broken")?;
    assert!(wait_for_lines(&build_log, 3).await, "expected a third build");
    assert_eq!(
        line_count(&run_log),
        2,
        "failed build must not restart the process"
    );

    // Graceful shutdown terminates the loop.
    harness
        .events_tx
        .send(RuntimeEvent::ShutdownRequested)
        .await?;
    timeout(Duration::from_secs(5), harness.runtime).await???;
    Ok(())
}
