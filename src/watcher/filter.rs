//! Event-level include/exclude filtering

use crate::pattern::PatternSet;

use super::event::{ChangeEvent, ChangeKind};

/// Decides whether a change should reach the debounce trigger.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    include_changes: PatternSet,
    exclude_changes: PatternSet,
}

impl EventFilter {
    pub fn new(include_changes: PatternSet, exclude_changes: PatternSet) -> Self {
        Self {
            include_changes,
            exclude_changes,
        }
    }

    /// Only writes are acted upon, and the path must pass both pattern checks.
    pub fn accept(&self, event: &ChangeEvent) -> bool {
        if event.kind != ChangeKind::Write {
            return false;
        }
        self.includes(&event.path) && !self.excludes(&event.path)
    }

    /// Without include patterns every path is included.
    pub fn includes(&self, path: &str) -> bool {
        if self.include_changes.is_empty() || is_blank(path) {
            return true;
        }
        self.include_changes.matches(path)
    }

    /// A blank path is always excluded, even with no exclude patterns.
    pub fn excludes(&self, path: &str) -> bool {
        is_blank(path) || self.exclude_changes.matches(path)
    }
}

fn is_blank(path: &str) -> bool {
    path.trim().is_empty()
}
