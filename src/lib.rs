//! # parfind
//!
//! Parallel filename search. The search root is split into independent work
//! units, the units are fanned out over a fixed pool of worker threads, and
//! the matches are merged into one sorted list.
//!
//! parfind owns the partitioner, the worker pool, the matcher ([`Query`]),
//! and the error type. It does **not** own argument parsing or output
//! formatting; those belong to the caller (see the `parfind` binary).
//!
//! # Quick Start
//!
//! ```rust
//! use std::fs;
//!
//! let dir = tempfile::tempdir().unwrap();
//! fs::write(dir.path().join("report.pdf"), "").unwrap();
//! fs::create_dir(dir.path().join("old")).unwrap();
//! fs::write(dir.path().join("old/report.txt"), "").unwrap();
//!
//! // No extension in the name, so every extension matches.
//! let result = parfind::search()
//!     .root(dir.path())
//!     .name("report")
//!     .run()
//!     .unwrap();
//!
//! assert!(result.is_complete());
//! assert_eq!(result.matches.len(), 2);
//! println!("Found {} files in {:.3}s", result.matches.len(), result.elapsed_secs());
//! ```
//!
//! # Stopping early
//!
//! A [`CancelToken`] ends a running search from another thread. The search
//! still returns what it found, marked [`Outcome::Interrupted`]:
//!
//! ```rust
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(dir.path().join("anything.txt"), "").unwrap();
//!
//! let token = parfind::CancelToken::new();
//! token.cancel();
//!
//! let result = parfind::search()
//!     .root(dir.path())
//!     .name("anything.txt")
//!     .cancel_token(token)
//!     .run()
//!     .unwrap();
//!
//! assert!(matches!(result.outcome, parfind::Outcome::Interrupted { .. }));
//! assert!(result.matches.is_empty());
//! ```

#![forbid(unsafe_code)]

mod builder;
mod cancel;
mod engine;
mod entry;
mod error;
mod partition;
mod query;
mod results;
mod traits;
mod walker;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::{SearchBuilder, DEFAULT_TIMEOUT, UNITS_PER_THREAD};
pub use cancel::CancelToken;
pub use entry::{MatchRecord, UnitKind, WorkUnit};
pub use error::SearchError;
pub use partition::{partition, Partition};
pub use query::{stem, CaseSensitivity, MatchMode, Query};
pub use results::{Outcome, ScanStats, SearchResult};
pub use traits::Matcher;

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`SearchBuilder`] to configure and run a search.
///
/// # Example
///
/// ```rust
/// use std::fs;
///
/// let dir = tempfile::tempdir().unwrap();
/// fs::write(dir.path().join("a.txt"), "").unwrap();
/// fs::write(dir.path().join("a.csv"), "").unwrap();
///
/// let result = parfind::search()
///     .root(dir.path())
///     .name("a.txt")
///     .run()
///     .unwrap();
///
/// assert_eq!(result.matches.len(), 1);
/// assert_eq!(result.matches[0].filename, "a.txt");
/// ```
pub fn search() -> SearchBuilder {
    SearchBuilder::default()
}
