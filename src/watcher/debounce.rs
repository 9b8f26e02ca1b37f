//! Delayed callback invocation

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use serde::{Deserialize, Serialize};

/// Callback invoked with the changed path
pub type ChangeCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// How repeated events are collapsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DebounceMode {
    /// Every accepted event fires the callback once after its own delay
    #[default]
    PerEvent,
    /// A new event for a path cancels and restarts that path's pending timer
    Coalesce,
}

impl DebounceMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "per-event" | "per_event" | "perevent" => Some(Self::PerEvent),
            "coalesce" => Some(Self::Coalesce),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerEvent => "per-event",
            Self::Coalesce => "coalesce",
        }
    }
}

/// Run `cb` after `duration` unless a message arrives on `cancel` first.
///
/// Returns true if the callback ran. If every sender of `cancel` is dropped
/// the timer can no longer be cancelled and fires at its deadline.
pub fn timeout(cancel: &Receiver<()>, duration: Duration, cb: impl FnOnce()) -> bool {
    let deadline = Instant::now() + duration;
    match cancel.recv_timeout(duration) {
        Ok(()) => false,
        Err(RecvTimeoutError::Timeout) => {
            cb();
            true
        }
        Err(RecvTimeoutError::Disconnected) => {
            thread::sleep(deadline.saturating_duration_since(Instant::now()));
            cb();
            true
        }
    }
}

type PendingTimers = Arc<Mutex<HashMap<String, (u64, Sender<()>)>>>;

/// Schedules delayed callback invocations, one timer thread per event.
pub struct DebounceTrigger {
    callback: ChangeCallback,
    delay: Duration,
    mode: DebounceMode,
    /// Coalesce mode only: latest timer per path, removed when it finishes
    pending: PendingTimers,
    next_id: u64,
}

impl DebounceTrigger {
    pub fn new(callback: ChangeCallback, delay: Duration, mode: DebounceMode) -> Self {
        Self {
            callback,
            delay,
            mode,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start a timer that invokes the callback with `path` once it elapses.
    ///
    /// Returns the cancellation handle of the new timer; sending on it before
    /// expiry aborts the invocation. Dropping it does not.
    pub fn schedule(&mut self, path: String) -> Sender<()> {
        let (cancel_tx, cancel_rx) = bounded::<()>(1);
        let id = self.next_id;
        self.next_id += 1;

        let tracked = self.mode == DebounceMode::Coalesce;
        if tracked {
            let mut pending = lock(&self.pending);
            if let Some((_, previous)) = pending.insert(path.clone(), (id, cancel_tx.clone())) {
                let _ = previous.try_send(());
            }
        }

        let key = tracked.then(|| path.clone());
        let callback = Arc::clone(&self.callback);
        let pending = Arc::clone(&self.pending);
        let delay = self.delay;
        let spawned = thread::Builder::new()
            .name("treewatch-debounce".to_string())
            .spawn(move || {
                let fired = timeout(&cancel_rx, delay, || callback(&path));
                if !fired {
                    tracing::trace!(path = %path, "debounced change superseded");
                }
                if tracked {
                    forget(&pending, &path, id);
                }
            });
        if let Err(err) = spawned {
            tracing::error!(error = %err, "failed to spawn debounce timer");
            if let Some(key) = key {
                forget(&self.pending, &key, id);
            }
        }

        cancel_tx
    }

    /// Number of paths with a coalescing timer still waiting
    pub fn pending_paths(&self) -> usize {
        lock(&self.pending).len()
    }
}

fn lock(pending: &PendingTimers) -> MutexGuard<'_, HashMap<String, (u64, Sender<()>)>> {
    pending.lock().unwrap_or_else(|e| e.into_inner())
}

/// Drop the entry for `path` if it still belongs to timer `id`
fn forget(pending: &PendingTimers, path: &str, id: u64) {
    let mut pending = lock(pending);
    if pending.get(path).is_some_and(|(current, _)| *current == id) {
        pending.remove(path);
    }
}
