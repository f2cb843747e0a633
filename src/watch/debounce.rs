// src/watch/debounce.rs

use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use crate::engine::{RuntimeEvent, TriggerReason};

/// Coalesces bursts of qualifying change events into one rebuild trigger.
///
/// The debouncer holds zero or one pending timer. Every [`notify`] cancels
/// the previous timer and arms a fresh one; only a full quiescence window
/// with no further events lets the timer fire, at which point a single
/// [`RuntimeEvent::BuildRequested`] is emitted into the runtime channel.
///
/// A continuous stream of events therefore postpones the rebuild
/// indefinitely. That is deliberate wait-for-rest semantics: there is no
/// periodic flush.
///
/// [`notify`]: Debouncer::notify
pub struct Debouncer {
    window: Duration,
    events_tx: mpsc::Sender<RuntimeEvent>,
    /// The pending timer token. `None` while idle; a live [`JoinHandle`]
    /// while a rebuild is scheduled but not yet started.
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(window: Duration, events_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self {
            window,
            events_tx,
            pending: Mutex::new(None),
        }
    }

    /// Record a qualifying event: cancel any pending timer and arm a new one.
    ///
    /// Safe to call concurrently; arming and cancelling happen under a
    /// single lock on the pending slot.
    pub async fn notify(&self) {
        let mut pending = self.pending.lock().await;

        if let Some(timer) = pending.take() {
            timer.abort();
            debug!("debounce timer re-armed");
        } else {
            debug!("debounce timer armed");
        }

        let window = self.window;
        let events_tx = self.events_tx.clone();
        *pending = Some(tokio::spawn(async move {
            sleep(window).await;
            let _ = events_tx
                .send(RuntimeEvent::BuildRequested {
                    reason: TriggerReason::FileChange,
                })
                .await;
        }));
    }

    /// Forget the pending token once the scheduled build begins.
    ///
    /// The timer has already fired by the time this is called, so the handle
    /// is dropped (detached), never aborted. A timer armed by a later event
    /// that slipped in between fire and clear keeps running.
    pub async fn clear(&self) {
        self.pending.lock().await.take();
    }
}
