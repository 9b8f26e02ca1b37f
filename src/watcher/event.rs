//! Change events as seen by the filter

use notify::event::{EventKind, ModifyKind};

/// Coarse classification of a low-level notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Create,
    /// File contents were written
    Write,
    Remove,
    Rename,
    Metadata,
    Access,
    Other,
}

impl From<&EventKind> for ChangeKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => ChangeKind::Create,
            EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
                ChangeKind::Write
            }
            EventKind::Modify(ModifyKind::Metadata(_)) => ChangeKind::Metadata,
            EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Rename,
            EventKind::Remove(_) => ChangeKind::Remove,
            EventKind::Access(_) => ChangeKind::Access,
            EventKind::Modify(ModifyKind::Other) | EventKind::Any | EventKind::Other => {
                ChangeKind::Other
            }
        }
    }
}

/// A single path-level change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: String,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn write(path: impl Into<String>) -> Self {
        Self::new(ChangeKind::Write, path)
    }

    /// Split a notify event into one change per path.
    ///
    /// Backends occasionally deliver events without a path; those become a
    /// single change with an empty path so the filter can reject them.
    pub fn from_notify(event: &notify::Event) -> Vec<Self> {
        let kind = ChangeKind::from(&event.kind);
        if event.paths.is_empty() {
            return vec![Self::new(kind, String::new())];
        }
        event
            .paths
            .iter()
            .map(|p| Self::new(kind, p.to_string_lossy().into_owned()))
            .collect()
    }
}
