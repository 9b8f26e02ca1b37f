//! Init command - write a starter treewatch.toml

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use treewatch::config::CONFIG_TEMPLATE;

pub fn cmd_init(path: &Path, force: bool, json: bool) -> Result<()> {
    if path.exists() && !force {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "event": "error",
                    "command": "init",
                    "kind": "already_exists",
                    "path": path.display().to_string(),
                    "message": "config file already exists"
                })
            );
        }
        bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "complete",
                "command": "init",
                "path": path.display().to_string(),
            })
        );
    } else {
        println!("Created {}", path.display());
        println!("Edit [watch] and [command], then run `treewatch run`.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_template() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("treewatch.toml");
        cmd_init(&path, false, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG_TEMPLATE);
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("treewatch.toml");
        fs::write(&path, "# mine\n").unwrap();

        assert!(cmd_init(&path, false, true).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");

        cmd_init(&path, true, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG_TEMPLATE);
    }
}
