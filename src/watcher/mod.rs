//! Recursive directory watcher
//!
//! A [`Watcher`] registers every directory under its include roots with the
//! OS notification mechanism, filters write events through include/exclude
//! change patterns, and invokes the configured callback once per accepted
//! event after a delay. [`Watcher::run`] blocks until a shutdown request, an
//! OS signal, or an unrecoverable mechanism error.
//!
//! ```ignore
//! let config = WatcherConfig::new(Arc::new(|path: &str| println!("{path}")))
//!     .with_include_paths(vec!["/srv/app/src".into()])
//!     .with_include_changes(vec![r"\.rs$".into()]);
//! let watcher = Watcher::new(config)?;
//! watcher.run()?;
//! ```

mod debounce;
mod event;
mod event_loop;
mod filter;
mod registrar;
mod shutdown;

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver};
use notify::{Config, Event, RecommendedWatcher, Watcher as _};

use crate::error::{WatchError, WatchResult};
use crate::pattern::PatternSet;

pub use debounce::{timeout, ChangeCallback, DebounceMode, DebounceTrigger};
pub use event::{ChangeEvent, ChangeKind};
pub use filter::EventFilter;
pub use registrar::{
    collect_watch_dirs, DirectoryList, TreeRegistrar, WatchRegistry, DEFAULT_RECURSION_LIMIT,
};
pub use shutdown::{ShutdownHandle, StopReason};

use event_loop::WatchLoop;

/// Delay before the change callback runs, in milliseconds
pub const DEFAULT_DELAY_MS: i64 = 1500;

/// Watcher configuration
#[derive(Clone)]
pub struct WatcherConfig {
    /// Invoked with the changed path
    pub callback: ChangeCallback,
    /// Zero or negative selects [`DEFAULT_DELAY_MS`]
    pub delay_ms: i64,
    /// Absolute directories watched recursively
    pub include_paths: Vec<PathBuf>,
    /// Directories matching these are not registered
    pub exclude_paths: Vec<String>,
    /// If any are set, a changed path must match one of them
    pub include_changes: Vec<String>,
    /// Changed paths matching these are ignored
    pub exclude_changes: Vec<String>,
    /// Entries visited per include root before registration fails
    pub recursion_limit: usize,
    pub debounce: DebounceMode,
    /// Relay SIGINT/SIGTERM to the watcher while it runs.
    ///
    /// The process-wide handler stays installed after `run` returns; once no
    /// watcher is running, those signals are swallowed.
    pub handle_signals: bool,
}

impl WatcherConfig {
    pub fn new(callback: ChangeCallback) -> Self {
        Self {
            callback,
            delay_ms: DEFAULT_DELAY_MS,
            include_paths: Vec::new(),
            exclude_paths: Vec::new(),
            include_changes: Vec::new(),
            exclude_changes: Vec::new(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            debounce: DebounceMode::default(),
            handle_signals: true,
        }
    }

    pub fn with_delay_ms(mut self, delay_ms: i64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_include_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.include_paths = paths;
        self
    }

    pub fn with_exclude_paths(mut self, patterns: Vec<String>) -> Self {
        self.exclude_paths = patterns;
        self
    }

    pub fn with_include_changes(mut self, patterns: Vec<String>) -> Self {
        self.include_changes = patterns;
        self
    }

    pub fn with_exclude_changes(mut self, patterns: Vec<String>) -> Self {
        self.exclude_changes = patterns;
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn with_debounce(mut self, mode: DebounceMode) -> Self {
        self.debounce = mode;
        self
    }

    pub fn with_signal_handling(mut self, enabled: bool) -> Self {
        self.handle_signals = enabled;
        self
    }

    /// The debounce window actually used
    pub fn delay(&self) -> Duration {
        let ms = if self.delay_ms > 0 {
            self.delay_ms
        } else {
            DEFAULT_DELAY_MS
        };
        Duration::from_millis(ms as u64)
    }
}

impl fmt::Debug for WatcherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatcherConfig")
            .field("delay_ms", &self.delay_ms)
            .field("include_paths", &self.include_paths)
            .field("exclude_paths", &self.exclude_paths)
            .field("include_changes", &self.include_changes)
            .field("exclude_changes", &self.exclude_changes)
            .field("recursion_limit", &self.recursion_limit)
            .field("debounce", &self.debounce)
            .field("handle_signals", &self.handle_signals)
            .finish_non_exhaustive()
    }
}

/// Lifecycle of a watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Registering,
    Active,
    Stopped(StopReason),
}

/// A recursive directory watcher
pub struct Watcher {
    config: WatcherConfig,
    exclude_paths: PatternSet,
    filter: EventFilter,
    shutdown: ShutdownHandle,
    shutdown_rx: Receiver<StopReason>,
    state: Mutex<WatchState>,
}

impl Watcher {
    /// Compile the configured patterns, failing on the first invalid one.
    pub fn new(config: WatcherConfig) -> WatchResult<Self> {
        let exclude_paths = PatternSet::new(&config.exclude_paths)?;
        let include_changes = PatternSet::new(&config.include_changes)?;
        let exclude_changes = PatternSet::new(&config.exclude_changes)?;
        let (tx, shutdown_rx) = unbounded();

        Ok(Self {
            exclude_paths,
            filter: EventFilter::new(include_changes, exclude_changes),
            shutdown: ShutdownHandle::new(tx),
            shutdown_rx,
            state: Mutex::new(WatchState::Idle),
            config,
        })
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    pub fn state(&self) -> WatchState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Request shutdown. Does not wait for `run` to return.
    pub fn signal(&self) {
        self.shutdown.signal();
    }

    /// A cloneable handle for stopping the watcher from elsewhere
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Register the include trees and process events until stopped.
    ///
    /// Returns `Ok(())` on a clean stop, or the first unrecoverable error.
    /// A watcher runs at most once.
    pub fn run(&self) -> WatchResult<()> {
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            if *state != WatchState::Idle {
                return Err(WatchError::AlreadyStarted);
            }
            *state = WatchState::Registering;
        }

        let result = self.run_inner();
        if let Err(err) = &result {
            if self.state() != WatchState::Stopped(StopReason::MechanismError) {
                tracing::error!(error = %err, "watcher failed");
                self.set_state(WatchState::Stopped(StopReason::MechanismError));
            }
        }
        result
    }

    fn run_inner(&self) -> WatchResult<()> {
        let _signals = if self.config.handle_signals {
            Some(shutdown::subscribe(self.shutdown.clone())?)
        } else {
            None
        };

        let (event_tx, event_rx) = unbounded::<Event>();
        let (error_tx, error_rx) = unbounded::<notify::Error>();
        let mut handle = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let _ = event_tx.send(event);
                }
                Err(err) => {
                    let _ = error_tx.send(err);
                }
            },
            Config::default(),
        )?;

        let registered = TreeRegistrar::new(&self.exclude_paths, self.config.recursion_limit)
            .register(&mut handle, &self.config.include_paths)?;
        tracing::info!(
            roots = self.config.include_paths.len(),
            directories = registered.len(),
            "watching"
        );
        self.set_state(WatchState::Active);

        let trigger = DebounceTrigger::new(
            Arc::clone(&self.config.callback),
            self.config.delay(),
            self.config.debounce,
        );
        let exit = WatchLoop::new(&self.filter, trigger, self.shutdown.clone()).run(
            &event_rx,
            &error_rx,
            &self.shutdown_rx,
        );

        drop(handle);
        tracing::info!(reason = %exit.reason, "watcher stopped");
        self.set_state(WatchState::Stopped(exit.reason));

        match exit.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn set_state(&self, next: WatchState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next;
    }
}

impl fmt::Debug for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
