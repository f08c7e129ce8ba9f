//! Fixture builders shared by unit and integration tests.

use crate::model::{EntryKind, PathEntry, RepositoryRef, RevisionTag};

pub fn repo() -> RepositoryRef {
    RepositoryRef::new("octo", "notes")
}

/// File entry at the root with the given revision tag.
pub fn file_entry(name: &str, tag: &str) -> PathEntry {
    PathEntry {
        name: name.to_string(),
        path: name.to_string(),
        kind: EntryKind::File,
        size: 0,
        revision_tag: RevisionTag::new(tag),
    }
}

pub fn dir_entry(name: &str) -> PathEntry {
    PathEntry {
        name: name.to_string(),
        path: name.to_string(),
        kind: EntryKind::Directory,
        size: 0,
        revision_tag: RevisionTag::new(format!("tree-{name}")),
    }
}
