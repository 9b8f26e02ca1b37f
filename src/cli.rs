use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use treewatch::DebounceMode;

/// treewatch - re-run commands when directory trees change
#[derive(Parser, Debug)]
#[command(name = "treewatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON reports instead of human-readable lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch directories and run a command on every change
    Run {
        #[command(flatten)]
        watch: WatchArgs,

        /// Command to run after each change (overrides [command].run).
        /// Words are joined into one `sh -c` string without re-quoting
        #[arg(last = true, value_name = "COMMAND")]
        command: Vec<String>,
    },

    /// List the directories that would be watched
    Check {
        #[command(flatten)]
        watch: WatchArgs,
    },

    /// Write a starter treewatch.toml
    Init {
        /// Where to write the config
        #[arg(default_value = "treewatch.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Flags shared by commands that build a watcher
#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Config file (default: ./treewatch.toml, then the user config)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory to watch recursively (repeatable; replaces configured paths)
    #[arg(short, long = "include", value_name = "DIR")]
    pub include: Vec<PathBuf>,

    /// Regex for directories not to watch (repeatable)
    #[arg(long, value_name = "REGEX")]
    pub exclude_path: Vec<String>,

    /// Regex a changed path must match (repeatable)
    #[arg(long, value_name = "REGEX")]
    pub include_change: Vec<String>,

    /// Regex for changed paths to ignore (repeatable)
    #[arg(long, value_name = "REGEX")]
    pub exclude_change: Vec<String>,

    /// Debounce window in milliseconds (0 or less selects 1500)
    #[arg(long, allow_negative_numbers = true)]
    pub delay_ms: Option<i64>,

    /// Entries visited per include path before giving up
    #[arg(long)]
    pub recursion_limit: Option<usize>,

    /// per-event or coalesce
    #[arg(long, value_parser = parse_debounce)]
    pub debounce: Option<DebounceMode>,
}

fn parse_debounce(value: &str) -> Result<DebounceMode, String> {
    DebounceMode::parse(value)
        .ok_or_else(|| format!("invalid debounce mode '{}' (per-event, coalesce)", value))
}
