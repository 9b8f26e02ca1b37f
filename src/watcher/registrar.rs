//! Directory registration
//!
//! The OS mechanism only reports changes to direct children of a watched
//! directory, so every qualifying subdirectory is registered on its own.
//! Traversal uses an explicit worklist and a per-root entry budget.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher as _};

use crate::error::{WatchError, WatchResult};
use crate::pattern::PatternSet;

/// Default number of entries visited per include root
pub const DEFAULT_RECURSION_LIMIT: usize = 10;

/// Something directories can be registered with
pub trait WatchRegistry {
    /// Watch a single directory, non-recursively
    fn watch_dir(&mut self, dir: &Path) -> WatchResult<()>;
}

impl WatchRegistry for RecommendedWatcher {
    fn watch_dir(&mut self, dir: &Path) -> WatchResult<()> {
        self.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(())
    }
}

/// In-memory registry, used for dry runs
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectoryList {
    pub dirs: Vec<PathBuf>,
}

impl WatchRegistry for DirectoryList {
    fn watch_dir(&mut self, dir: &Path) -> WatchResult<()> {
        self.dirs.push(dir.to_path_buf());
        Ok(())
    }
}

/// Walks include roots and registers every directory not matched by the
/// exclude-path patterns.
pub struct TreeRegistrar<'a> {
    exclude_paths: &'a PatternSet,
    limit: usize,
}

impl<'a> TreeRegistrar<'a> {
    pub fn new(exclude_paths: &'a PatternSet, limit: usize) -> Self {
        Self {
            exclude_paths,
            limit,
        }
    }

    /// Register every qualifying directory under `roots`.
    ///
    /// All roots are checked for being absolute before anything is
    /// registered. Returns the registered directories in registration order;
    /// a directory reachable from several roots is registered once.
    pub fn register<R: WatchRegistry + ?Sized>(
        &self,
        registry: &mut R,
        roots: &[PathBuf],
    ) -> WatchResult<Vec<PathBuf>> {
        if let Some(path) = roots.iter().find(|p| !p.is_absolute()) {
            return Err(WatchError::NotAbsolutePath { path: path.clone() });
        }

        let mut seen = HashSet::new();
        let mut registered = Vec::new();
        for root in roots {
            self.register_root(registry, root, &mut seen, &mut registered)?;
        }
        Ok(registered)
    }

    fn register_root<R: WatchRegistry + ?Sized>(
        &self,
        registry: &mut R,
        root: &Path,
        seen: &mut HashSet<PathBuf>,
        registered: &mut Vec<PathBuf>,
    ) -> WatchResult<()> {
        let root_meta = std::fs::symlink_metadata(root).map_err(|source| WatchError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        if !root_meta.is_dir() {
            tracing::warn!(root = %root.display(), "include path is not a directory, skipping");
            return Ok(());
        }

        let mut stack = vec![root.to_path_buf()];
        let mut visited = 0usize;

        while let Some(path) = stack.pop() {
            if visited > self.limit {
                return Err(WatchError::RecursionLimit {
                    root: root.to_path_buf(),
                    limit: self.limit,
                });
            }
            visited += 1;

            let is_dir = match std::fs::symlink_metadata(&path) {
                Ok(meta) => meta.is_dir(),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "cannot stat entry");
                    continue;
                }
            };
            if !is_dir {
                continue;
            }

            if self.exclude_paths.matches(&path.to_string_lossy()) {
                tracing::debug!(dir = %path.display(), "excluded from watch");
            } else if seen.insert(path.clone()) {
                registry.watch_dir(&path)?;
                tracing::debug!(dir = %path.display(), "watching");
                registered.push(path.clone());
            }

            match std::fs::read_dir(&path) {
                Ok(entries) => {
                    let mut children: Vec<PathBuf> =
                        entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
                    // Pop order then follows lexical order
                    children.sort_unstable_by(|a, b| b.cmp(a));
                    stack.extend(children);
                }
                Err(err) => {
                    tracing::warn!(dir = %path.display(), error = %err, "cannot read directory");
                }
            }
        }

        Ok(())
    }
}

/// List the directories a watcher would register, without touching the OS
/// mechanism.
pub fn collect_watch_dirs(
    roots: &[PathBuf],
    exclude_paths: &PatternSet,
    limit: usize,
) -> WatchResult<Vec<PathBuf>> {
    let mut list = DirectoryList::default();
    TreeRegistrar::new(exclude_paths, limit).register(&mut list, roots)
}
