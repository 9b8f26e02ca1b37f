//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{WatchError, WatchResult};
use crate::watcher::DebounceMode;

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::Config;

/// Project config file name, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "treewatch.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// A configuration together with where it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    /// `None` when built-in defaults were used
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> WatchResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|source| WatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let mut config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| WatchError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(base) = path.parent() {
        let base = if base.as_os_str().is_empty() {
            std::env::current_dir().unwrap_or_default()
        } else {
            base.to_path_buf()
        };
        config.resolve_include_paths(&base);
    }

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from an explicit file, the project config, the user config, or defaults.
///
/// An explicit file must exist; the others are optional.
pub fn load_or_default(explicit: Option<&Path>, project_root: &Path) -> WatchResult<LoadedConfig> {
    let candidates: Vec<PathBuf> = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => {
            let mut found = vec![project_root.join(PROJECT_CONFIG_FILE)];
            if let Some(user) = user_config_path() {
                found.push(user);
            }
            found.retain(|p| p.exists());
            found
        }
    };

    match candidates.into_iter().next() {
        Some(path) => {
            let (config, warnings) = load_with_warnings(&path)?;
            Ok(LoadedConfig {
                config: with_env_overrides(config),
                source: Some(path),
                warnings,
            })
        }
        None => Ok(LoadedConfig {
            config: with_env_overrides(Config::default()),
            source: None,
            warnings: Vec::new(),
        }),
    }
}

/// User-level config file (`<config dir>/treewatch/config.toml`)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("treewatch").join("config.toml"))
}

/// Apply environment variable overrides (TREEWATCH_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_env_overrides_from(config, |name| std::env::var(name).ok(), &mut std::io::stderr())
}

/// Apply overrides from an arbitrary lookup; warnings go to `writer`.
pub fn with_env_overrides_from<F, W>(mut config: Config, lookup: F, writer: &mut W) -> Config
where
    F: Fn(&str) -> Option<String>,
    W: std::io::Write,
{
    // TREEWATCH_DELAY_MS
    if let Some(value) = lookup("TREEWATCH_DELAY_MS") {
        match value.trim().parse::<i64>() {
            Ok(ms) => config.watch.delay_ms = ms,
            Err(_) => {
                let _ = writeln!(
                    writer,
                    "Warning: Invalid TREEWATCH_DELAY_MS value '{}', expected milliseconds",
                    value
                );
            }
        }
    }

    // TREEWATCH_RECURSION_LIMIT
    if let Some(value) = lookup("TREEWATCH_RECURSION_LIMIT") {
        match value.trim().parse::<usize>() {
            Ok(limit) => config.watch.recursion_limit = limit,
            Err(_) => {
                let _ = writeln!(
                    writer,
                    "Warning: Invalid TREEWATCH_RECURSION_LIMIT value '{}', expected a count",
                    value
                );
            }
        }
    }

    // TREEWATCH_DEBOUNCE
    if let Some(value) = lookup("TREEWATCH_DEBOUNCE") {
        let validator = EnvVarValidator::new("TREEWATCH_DEBOUNCE", &["per-event", "coalesce"]);
        config.watch.debounce =
            validator.parse_with_writer(&value, DebounceMode::parse, config.watch.debounce, writer);
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "watch",
        "include_paths",
        "exclude_paths",
        "include_changes",
        "exclude_changes",
        "delay_ms",
        "recursion_limit",
        "debounce",
        "command",
        "run",
    ];

    let mut best: Option<(&str, usize)> = None;
    for &candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}
