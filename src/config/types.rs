//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WatchResult;
use crate::watcher::{
    ChangeCallback, DebounceMode, WatcherConfig, DEFAULT_DELAY_MS, DEFAULT_RECURSION_LIMIT,
};

use super::loader::{self, ConfigWarning};

/// `[watch]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Relative entries resolve against the config file's directory
    #[serde(default)]
    pub include_paths: Vec<PathBuf>,

    #[serde(default)]
    pub exclude_paths: Vec<String>,

    #[serde(default)]
    pub include_changes: Vec<String>,

    #[serde(default)]
    pub exclude_changes: Vec<String>,

    #[serde(default = "default_delay_ms")]
    pub delay_ms: i64,

    #[serde(default = "default_recursion_limit")]
    pub recursion_limit: usize,

    #[serde(default)]
    pub debounce: DebounceMode,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            include_paths: Vec::new(),
            exclude_paths: Vec::new(),
            include_changes: Vec::new(),
            exclude_changes: Vec::new(),
            delay_ms: default_delay_ms(),
            recursion_limit: default_recursion_limit(),
            debounce: DebounceMode::default(),
        }
    }
}

fn default_delay_ms() -> i64 {
    DEFAULT_DELAY_MS
}

fn default_recursion_limit() -> usize {
    DEFAULT_RECURSION_LIMIT
}

/// `[command]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Shell command run after each debounced change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub command: CommandConfig,
}

impl Config {
    /// Load a config file; relative include paths resolve against its directory
    pub fn load(path: &Path) -> WatchResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    pub fn load_with_warnings(path: &Path) -> WatchResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Make every include path absolute by joining relative ones onto `base`
    pub fn resolve_include_paths(&mut self, base: &Path) {
        for path in &mut self.watch.include_paths {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Build the library configuration for a watcher
    pub fn to_watcher_config(&self, callback: ChangeCallback) -> WatcherConfig {
        WatcherConfig::new(callback)
            .with_delay_ms(self.watch.delay_ms)
            .with_include_paths(self.watch.include_paths.clone())
            .with_exclude_paths(self.watch.exclude_paths.clone())
            .with_include_changes(self.watch.include_changes.clone())
            .with_exclude_changes(self.watch.exclude_changes.clone())
            .with_recursion_limit(self.watch.recursion_limit)
            .with_debounce(self.watch.debounce)
    }
}
