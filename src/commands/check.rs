use std::sync::Arc;

use anyhow::{Context, Result};
use treewatch::{collect_watch_dirs, PatternSet, WatchReport, Watcher};

use super::{resolve_config, Reporter};
use crate::cli::WatchArgs;

/// Print the directories a `run` with the same flags would watch
pub fn cmd_check(args: &WatchArgs, json: bool) -> Result<()> {
    let loaded = resolve_config(args)?;
    let config = loaded.config;
    let reporter = Reporter::new(json);

    // Compiles every pattern, not just the exclude-path set.
    Watcher::new(config.to_watcher_config(Arc::new(|_: &str| {})))
        .context("Invalid watch configuration")?;
    let exclude = PatternSet::new(&config.watch.exclude_paths)?;

    let dirs = match collect_watch_dirs(
        &config.watch.include_paths,
        &exclude,
        config.watch.recursion_limit,
    ) {
        Ok(dirs) => dirs,
        Err(err) => {
            reporter.emit(&WatchReport::Error {
                message: err.to_string(),
            });
            return Err(err).context("Registration would fail");
        }
    };

    if json {
        let event = serde_json::json!({
            "event": "check",
            "config": loaded.source.as_ref().map(|p| p.display().to_string()),
            "roots": config.watch.include_paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "directories": dirs.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        });
        println!("{}", event);
        return Ok(());
    }

    match &loaded.source {
        Some(source) => println!("Config: {}", source.display()),
        None => println!("Config: (defaults)"),
    }
    for dir in &dirs {
        println!("  {}", dir.display());
    }
    println!(
        "{} director{} would be watched (limit {} entries per root)",
        dirs.len(),
        if dirs.len() == 1 { "y" } else { "ies" },
        config.watch.recursion_limit
    );
    Ok(())
}
