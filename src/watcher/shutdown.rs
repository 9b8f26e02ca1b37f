//! Shutdown signalling
//!
//! Programmatic stops go through [`ShutdownHandle`]. OS signals (Ctrl+C,
//! SIGTERM) are relayed onto the same channel by a handler that is installed
//! once per process and fans out to every running watcher.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

use crossbeam_channel::Sender;
use serde::Serialize;

use crate::error::{WatchError, WatchResult};

/// Why a watcher stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// SIGINT or SIGTERM
    UserSignal,
    /// `Watcher::signal` or a cloned handle
    ProgrammaticSignal,
    /// The notification channel closed
    ChannelClosed,
    /// The notification mechanism reported an error
    MechanismError,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::UserSignal => "user signal",
            StopReason::ProgrammaticSignal => "programmatic signal",
            StopReason::ChannelClosed => "channel closed",
            StopReason::MechanismError => "mechanism error",
        };
        f.write_str(s)
    }
}

/// Cloneable trigger for stopping a running watcher.
///
/// Sending never blocks; extra requests after the first are ignored by the
/// loop.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Sender<StopReason>,
}

impl ShutdownHandle {
    pub(crate) fn new(tx: Sender<StopReason>) -> Self {
        Self { tx }
    }

    /// Request a clean stop
    pub fn signal(&self) {
        self.request(StopReason::ProgrammaticSignal);
    }

    pub(crate) fn request(&self, reason: StopReason) {
        // The receiver lives as long as the watcher; a failed send means
        // there is nobody left to stop.
        let _ = self.tx.send(reason);
    }
}

type Subscribers = Mutex<Vec<(u64, ShutdownHandle)>>;

static SUBSCRIBERS: OnceLock<Subscribers> = OnceLock::new();
static HANDLER: OnceLock<Result<(), String>> = OnceLock::new();
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn subscribers() -> &'static Subscribers {
    SUBSCRIBERS.get_or_init(|| Mutex::new(Vec::new()))
}

/// Keeps a handle subscribed to OS signals until dropped
#[derive(Debug)]
pub(crate) struct SignalSubscription {
    id: u64,
}

/// Relay SIGINT/SIGTERM to `handle` until the returned guard is dropped.
pub(crate) fn subscribe(handle: ShutdownHandle) -> WatchResult<SignalSubscription> {
    let installed = HANDLER.get_or_init(|| {
        ctrlc::set_handler(|| {
            let subs = subscribers().lock().unwrap_or_else(|e| e.into_inner());
            for (_, handle) in subs.iter() {
                handle.request(StopReason::UserSignal);
            }
        })
        .map_err(|e| e.to_string())
    });
    if let Err(message) = installed {
        return Err(WatchError::SignalHandler(message.clone()));
    }

    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    subscribers()
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push((id, handle));
    Ok(SignalSubscription { id })
}

impl Drop for SignalSubscription {
    fn drop(&mut self) {
        subscribers()
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|(id, _)| *id != self.id);
    }
}
