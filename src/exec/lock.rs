// src/exec/lock.rs

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

/// Registry of async locks keyed by name.
///
/// Holding the lock for a given name makes work under that name mutually
/// exclusive across tasks. A second acquirer blocks until the first guard is
/// dropped, then proceeds; nothing is skipped or coalesced.
#[derive(Clone, Default)]
pub struct NamedLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl NamedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch (or create) the lock registered under `name`.
    ///
    /// The returned handle is locked by the caller; the registry lock is
    /// only held long enough to look it up.
    pub async fn entry(&self, name: &str) -> Arc<Mutex<()>> {
        let mut registry = self.inner.lock().await;
        registry
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}
