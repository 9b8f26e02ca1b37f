//! treewatch CLI - re-run a command whenever a directory tree changes
//!
//! Usage: treewatch <COMMAND>
//!
//! Commands:
//!   run    Watch directories and run a command on every change
//!   check  List the directories that would be watched
//!   init   Write a starter treewatch.toml

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod logging;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Run { watch, command } => commands::run::cmd_run(&watch, &command, cli.json),
        Commands::Check { watch } => commands::check::cmd_check(&watch, cli.json),
        Commands::Init { path, force } => commands::init::cmd_init(&path, force, cli.json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use treewatch::DebounceMode;

    #[test]
    fn test_cli_parse_run_with_command() {
        let cli = Cli::try_parse_from([
            "treewatch",
            "run",
            "--include",
            "src",
            "--include-change",
            r"\.rs$",
            "--delay-ms",
            "200",
            "--debounce",
            "coalesce",
            "--",
            "cargo",
            "build",
        ])
        .unwrap();

        match cli.command {
            Commands::Run { watch, command } => {
                assert_eq!(watch.include, vec![PathBuf::from("src")]);
                assert_eq!(watch.include_change, vec![r"\.rs$".to_string()]);
                assert_eq!(watch.delay_ms, Some(200));
                assert_eq!(watch.debounce, Some(DebounceMode::Coalesce));
                assert_eq!(command, vec!["cargo", "build"]);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_negative_delay() {
        let cli = Cli::try_parse_from(["treewatch", "check", "--delay-ms", "-5"]).unwrap();
        match cli.command {
            Commands::Check { watch } => assert_eq!(watch.delay_ms, Some(-5)),
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_debounce() {
        assert!(Cli::try_parse_from(["treewatch", "run", "--debounce", "sometimes"]).is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["treewatch", "init", "--force", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Init { path, force } => {
                assert_eq!(path, PathBuf::from("treewatch.toml"));
                assert!(force);
            }
            _ => panic!("Expected Init command"),
        }
    }
}
