use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::query::Query;

/// One independently dispatchable piece of the search tree.
///
/// Produced by the partitioner, consumed exactly once by exactly one worker.
#[derive(Debug, Clone)]
pub struct WorkUnit {
    /// Whether `path` is walked or checked on its own.
    pub kind: UnitKind,

    /// Root of the subtree this unit covers.
    pub path: PathBuf,

    /// The query every filename in the unit is checked against.
    pub query: Arc<Query>,
}

impl WorkUnit {
    pub fn file(path: PathBuf, query: Arc<Query>) -> Self {
        Self { kind: UnitKind::File, path, query }
    }

    pub fn directory(path: PathBuf, query: Arc<Query>) -> Self {
        Self { kind: UnitKind::Directory, path, query }
    }
}

/// The kind of a work unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// A single non-directory entry (regular file, symlink, device, ...).
    /// Its subtree is itself.
    File,

    /// A directory walked exhaustively.
    Directory,
}

/// A located file satisfying the query.
///
/// Ordered by directory, then filename, so merged results can be sorted
/// into a stable report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchRecord {
    /// Directory containing the file.
    pub directory: PathBuf,

    /// The file's own name.
    pub filename: String,
}

impl MatchRecord {
    /// Build a record from a full path. Returns `None` for paths without a
    /// final component (`/`, `..`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let filename = path.file_name()?.to_string_lossy().into_owned();
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Some(Self { directory, filename })
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}
