//! Configuration for the treewatch CLI
//!
//! Precedence, highest first:
//! 1. CLI flags
//! 2. Environment variables (TREEWATCH_*)
//! 3. Project config (`--config` or `./treewatch.toml`)
//! 4. User config (`<config dir>/treewatch/config.toml`)
//! 5. Built-in defaults

mod env_validator;
mod loader;
mod types;

pub use env_validator::{levenshtein, EnvVarValidator};
pub use loader::{
    load_or_default, load_with_warnings, user_config_path, with_env_overrides,
    with_env_overrides_from, ConfigWarning, LoadedConfig, PROJECT_CONFIG_FILE,
};
pub use types::{CommandConfig, Config, WatchConfig};

/// Template written by `treewatch init`
pub const CONFIG_TEMPLATE: &str = r#"# treewatch configuration

[watch]
# Directories watched recursively; relative entries resolve against this file
include_paths = ["."]
# Regex patterns; matching directories are not watched
exclude_paths = ['/\.git$', '/node_modules$', '/target$']
# Regex patterns; if any are set, a changed file must match one
include_changes = []
# Regex patterns; matching changed files are ignored
exclude_changes = ['\.swp$', '~$']
# Debounce window in milliseconds
delay_ms = 1500
# Entries (files included) visited per include path before giving up.
# Excluded directories are still walked, so count .git and node_modules too.
recursion_limit = 100000
# "per-event" runs once per write, "coalesce" once per burst on a file
debounce = "per-event"

[command]
# Shell command run after each change; TREEWATCH_PATH holds the changed path
# run = "make build"
"#;
