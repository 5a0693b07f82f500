//! Cancellable keyed debounce timers.
//!
//! Scheduling under a key replaces any pending task for that key, so only
//! the last of a burst of triggering events actually fires. A scheduler
//! that has been shut down drops late fires on the floor.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct DebounceScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
    alive: AtomicBool,
}

impl Default for DebounceScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl DebounceScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                tasks: Mutex::new(HashMap::new()),
                alive: AtomicBool::new(true),
            }),
        }
    }

    /// Schedule `action` to run after `delay`, replacing any pending task
    /// under the same key.
    pub fn schedule<F>(&self, key: &str, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.inner.alive.load(Ordering::SeqCst) {
            return;
        }

        let mut tasks = self.inner.tasks.lock();
        if let Some(previous) = tasks.remove(key) {
            previous.abort();
        }

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Liveness check: a timer outliving its owner is a no-op.
            if inner.alive.load(Ordering::SeqCst) {
                action();
            }
        });
        tasks.insert(key.to_string(), handle);
    }

    /// Cancel any pending task under `key`.
    pub fn cancel(&self, key: &str) {
        if let Some(handle) = self.inner.tasks.lock().remove(key) {
            handle.abort();
        }
    }

    /// Stop accepting work and abort everything pending.
    pub fn shutdown(&self) {
        self.inner.alive.store(false, Ordering::SeqCst);
        let mut tasks = self.inner.tasks.lock();
        for (_, handle) in tasks.drain() {
            handle.abort();
        }
    }
}
