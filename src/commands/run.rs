use std::process::{Command, ExitStatus};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use treewatch::{collect_watch_dirs, PatternSet, WatchReport, WatchState, Watcher};

use super::{resolve_config, Reporter};
use crate::cli::WatchArgs;

/// Runs the user's shell command for each change, one at a time
#[derive(Debug)]
pub struct CommandRunner {
    command: String,
    lock: Mutex<()>,
}

impl CommandRunner {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Run the command with `TREEWATCH_PATH=path`, reporting start and finish.
    ///
    /// Debounce timers fire on their own threads, so concurrent changes queue
    /// here.
    pub fn run(&self, path: &str, reporter: &Reporter) -> Option<ExitStatus> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        reporter.emit(&WatchReport::CommandStarted {
            command: self.command.clone(),
            path: path.to_string(),
        });

        match shell(&self.command).env("TREEWATCH_PATH", path).status() {
            Ok(status) => {
                if !status.success() {
                    tracing::warn!(command = %self.command, code = ?status.code(), "command failed");
                }
                reporter.emit(&WatchReport::CommandFinished {
                    command: self.command.clone(),
                    success: status.success(),
                    code: status.code(),
                });
                Some(status)
            }
            Err(err) => {
                tracing::warn!(command = %self.command, error = %err, "failed to spawn command");
                reporter.emit(&WatchReport::Error {
                    message: format!("failed to run `{}`: {}", self.command, err),
                });
                None
            }
        }
    }
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Join the words after `--` into one line for the shell.
///
/// Words are not re-quoted: `-- echo "a b"` runs `echo a b`. Pass the whole
/// command as a single quoted word to keep shell quoting.
fn shell_line(words: &[String]) -> String {
    words.join(" ")
}

/// Watch until Ctrl+C, running `command` (or `[command].run`) on each change
pub fn cmd_run(args: &WatchArgs, command: &[String], json: bool) -> Result<()> {
    let loaded = resolve_config(args)?;
    let config = loaded.config;
    let reporter = Reporter::new(json);

    let command = if command.is_empty() {
        config.command.run.clone()
    } else {
        Some(shell_line(command))
    };
    let runner = command.map(|c| Arc::new(CommandRunner::new(c)));

    let callback_runner = runner.clone();
    let watcher = Watcher::new(config.to_watcher_config(Arc::new(move |path: &str| {
        reporter.emit(&WatchReport::Change {
            path: path.to_string(),
        });
        if let Some(runner) = &callback_runner {
            runner.run(path, &reporter);
        }
    })))
    .context("Invalid watch configuration")?;

    // Same walk the watcher performs, so the banner can count directories
    // and registration errors surface before anything is opened.
    let exclude = PatternSet::new(&config.watch.exclude_paths)?;
    let dirs = collect_watch_dirs(
        &config.watch.include_paths,
        &exclude,
        config.watch.recursion_limit,
    )
    .map_err(|err| report_error(&reporter, err))?;

    reporter.emit(&WatchReport::WatchStarted {
        roots: config
            .watch
            .include_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        directories: dirs.len(),
    });
    if let Some(runner) = &runner {
        tracing::info!(command = runner.command(), "running command on change");
    }

    let result = watcher.run();
    if let WatchState::Stopped(reason) = watcher.state() {
        if let Err(err) = &result {
            reporter.emit(&WatchReport::Error {
                message: err.to_string(),
            });
        }
        reporter.emit(&WatchReport::Shutdown { reason });
    }
    result.context("Watcher stopped with an error")
}

fn report_error(reporter: &Reporter, err: treewatch::WatchError) -> anyhow::Error {
    reporter.emit(&WatchReport::Error {
        message: err.to_string(),
    });
    anyhow::Error::new(err)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_runner_passes_changed_path() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let runner = CommandRunner::new(format!("printf %s \"$TREEWATCH_PATH\" > '{}'", out.display()));

        let status = runner.run("/srv/app/main.go", &Reporter::new(true)).unwrap();
        assert!(status.success());
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "/srv/app/main.go");
    }

    #[test]
    fn test_shell_line_is_one_shell_string() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");

        let words = vec![format!("printf '%s|%s' 'a b' c > '{}'", out.display())];
        assert_eq!(shell_line(&words), words[0]);
        CommandRunner::new(shell_line(&words)).run("/x", &Reporter::new(true));
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "a b|c");

        let split: Vec<String> = ["echo", "a b"].iter().map(|w| w.to_string()).collect();
        assert_eq!(shell_line(&split), "echo a b");
    }

    #[test]
    fn test_runner_reports_failure_without_panicking() {
        let runner = CommandRunner::new("exit 3");
        let status = runner.run("/x", &Reporter::new(true)).unwrap();
        assert_eq!(status.code(), Some(3));
    }
}
