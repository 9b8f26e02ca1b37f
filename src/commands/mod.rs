pub mod check;
pub mod init;
pub mod run;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use treewatch::config::{self, ConfigWarning, LoadedConfig};
use treewatch::report::{timestamp_now, WatchReport};

use crate::cli::WatchArgs;

/// Load the layered config and apply CLI flags on top.
///
/// Include paths given on the command line resolve against the working
/// directory; with none configured anywhere, the working directory is watched.
pub fn resolve_config(args: &WatchArgs) -> Result<LoadedConfig> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let mut loaded = config::load_or_default(args.config.as_deref(), &cwd)
        .context("Failed to load configuration")?;

    if let Some(source) = &loaded.source {
        tracing::debug!(file = %source.display(), "loaded config");
        print_config_warnings(source, &loaded.warnings);
    }

    apply_overrides(&mut loaded.config, args, &cwd);
    Ok(loaded)
}

fn apply_overrides(config: &mut config::Config, args: &WatchArgs, cwd: &Path) {
    let watch = &mut config.watch;

    if !args.include.is_empty() {
        watch.include_paths = args.include.iter().map(|p| absolutize(p, cwd)).collect();
    }
    if watch.include_paths.is_empty() {
        watch.include_paths.push(cwd.to_path_buf());
    }

    watch.exclude_paths.extend(args.exclude_path.iter().cloned());
    watch.include_changes.extend(args.include_change.iter().cloned());
    watch.exclude_changes.extend(args.exclude_change.iter().cloned());

    if let Some(delay_ms) = args.delay_ms {
        watch.delay_ms = delay_ms;
    }
    if let Some(limit) = args.recursion_limit {
        watch.recursion_limit = limit;
    }
    if let Some(mode) = args.debounce {
        watch.debounce = mode;
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn print_config_warnings(path: &Path, warnings: &[ConfigWarning]) {
    for w in warnings {
        match w.line {
            Some(line) => eprintln!("⚠ Unknown config key '{}' in {}:{}", w.key, path.display(), line),
            None => eprintln!("⚠ Unknown config key '{}' in {}", w.key, path.display()),
        }
        if let Some(suggestion) = &w.suggestion {
            eprintln!("   Did you mean '{}'?", suggestion);
        }
    }
}

/// Writes reports to stdout, one line each
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    json: bool,
}

impl Reporter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn emit(&self, report: &WatchReport) {
        let line = if self.json {
            report.to_json()
        } else {
            report.render(&timestamp_now())
        };

        // Human error lines go to stderr; NDJSON stays on one stream.
        if !self.json && report.is_error() {
            let _ = writeln!(io::stderr().lock(), "{}", line);
        } else {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", line);
            let _ = out.flush();
        }
    }
}
