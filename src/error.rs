use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    // Query
    #[error("empty search name")]
    EmptyQuery,

    #[error("search name {0:?} has an empty stem")]
    EmptyStem(String),

    #[error("invalid search name {0:?}")]
    InvalidPattern(String),

    // Root
    #[error("no search root provided")]
    MissingRoot,

    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read search root {}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Pool
    #[error("invalid thread count: {0}")]
    InvalidThreadCount(usize),

    #[error("thread pool failure: {0}")]
    ThreadPool(String),

    // Traversal
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("IO error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk error: {0}")]
    Walk(String),
}

impl SearchError {
    /// The path this error occurred at, if applicable.
    /// Callers use this to present "Skipped: <path>" without pattern matching on variants.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::PermissionDenied(p)
            | Self::NotFound(p)
            | Self::Root { path: p, .. }
            | Self::Io { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether the search can continue after this error.
    ///
    /// Recoverable errors (permission denied, vanished entries) are skipped
    /// and the walk keeps going. Everything else is rejected before any
    /// work is dispatched.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_) | Self::Io { .. } | Self::Walk(_)
        )
    }
}

/// Convert an `ignore` walk error into a recoverable [`SearchError`].
pub(crate) fn from_walk_error(e: ignore::Error) -> SearchError {
    match e {
        ignore::Error::WithPath { path, err } => match *err {
            ignore::Error::Io(io_err) => from_io(path, io_err),
            other => SearchError::Walk(format!("{}: {}", path.display(), other)),
        },
        ignore::Error::WithDepth { err, .. } => from_walk_error(*err),
        ignore::Error::Io(io_err) => from_io(PathBuf::new(), io_err),
        other => SearchError::Walk(other.to_string()),
    }
}

pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> SearchError {
    if source.kind() == std::io::ErrorKind::PermissionDenied {
        SearchError::PermissionDenied(path)
    } else {
        SearchError::Io { path, source }
    }
}
