//! Reports emitted by the CLI while watching
//!
//! With `--json` each report is one NDJSON line; otherwise a short
//! timestamped line.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::watcher::StopReason;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchReport {
    WatchStarted {
        roots: Vec<String>,
        directories: usize,
    },
    Change {
        path: String,
    },
    CommandStarted {
        command: String,
        path: String,
    },
    CommandFinished {
        command: String,
        success: bool,
        code: Option<i32>,
    },
    Error {
        message: String,
    },
    Shutdown {
        reason: StopReason,
    },
}

impl WatchReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn is_error(&self) -> bool {
        match self {
            WatchReport::Error { .. } => true,
            WatchReport::CommandFinished { success, .. } => !success,
            _ => false,
        }
    }

    /// Human-readable line, without trailing newline
    pub fn render(&self, timestamp: &str) -> String {
        let body = match self {
            WatchReport::WatchStarted { roots, directories } => format!(
                "watching {} director{} under {}",
                directories,
                if *directories == 1 { "y" } else { "ies" },
                roots.join(", ")
            ),
            WatchReport::Change { path } => format!("changed {}", path),
            WatchReport::CommandStarted { command, .. } => format!("running `{}`", command),
            WatchReport::CommandFinished {
                command,
                success: true,
                ..
            } => format!("`{}` finished", command),
            WatchReport::CommandFinished {
                command,
                code: Some(code),
                ..
            } => format!("`{}` failed with exit code {}", command, code),
            WatchReport::CommandFinished { command, .. } => {
                format!("`{}` terminated by signal", command)
            }
            WatchReport::Error { message } => format!("error: {}", message),
            WatchReport::Shutdown { reason } => format!("stopped ({})", reason),
        };
        format!("[{}] {}", timestamp, body)
    }
}

/// Wall-clock `HH:MM:SS` (UTC) for human output
pub fn timestamp_now() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| format_clock(d.as_secs()))
        .unwrap_or_else(|_| "00:00:00".to_string())
}

fn format_clock(epoch_secs: u64) -> String {
    let secs = epoch_secs % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}
