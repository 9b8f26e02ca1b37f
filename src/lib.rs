//! treewatch - recursive directory watcher for development loops
//!
//! Watches directory trees for writes, filters them through regex
//! include/exclude rules at the directory and the event level, and invokes a
//! callback for each accepted change after a debounce delay. Runs until a
//! shutdown request, Ctrl+C/SIGTERM, or a watch mechanism error.

pub mod config;
pub mod error;
pub mod pattern;
pub mod report;
pub mod watcher;

// Re-exports for convenience
pub use config::Config;
pub use error::{WatchError, WatchResult};
pub use pattern::PatternSet;
pub use report::WatchReport;
pub use watcher::{
    collect_watch_dirs, timeout, ChangeCallback, ChangeEvent, ChangeKind, DebounceMode,
    DebounceTrigger, EventFilter, ShutdownHandle, StopReason, WatchState, Watcher, WatcherConfig,
};
