use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cancel::CancelToken;
use crate::engine::{dispatch, PoolConfig};
use crate::error::SearchError;
use crate::partition::partition;
use crate::query::{CaseSensitivity, Query};
use crate::results::{ScanStats, SearchResult};

/// Global ceiling on how long the parallel phase may run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(9999);

/// Units requested per worker thread when no target is given.
pub const UNITS_PER_THREAD: usize = 2;

// ---------------------------------------------------------------------------
// SearchBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and executing a search.
///
/// Created via [`parfind::search()`](crate::search). Configure with chained
/// builder methods, then call [`run()`](SearchBuilder::run) to execute.
///
/// # Example
///
/// ```rust,ignore
/// let result = parfind::search()
///     .root("/srv/data")
///     .name("report")
///     .threads(8)
///     .timeout(Duration::from_secs(60))
///     .run()?;
/// ```
pub struct SearchBuilder {
    root:           Option<PathBuf>,
    name:           Option<String>,
    query:          Option<Query>,
    all_extensions: bool,
    case:           CaseSensitivity,
    threads:        usize,
    target_units:   Option<usize>,
    timeout:        Duration,
    cancel:         CancelToken,
    collect_errors: bool,
}

impl Default for SearchBuilder {
    fn default() -> Self {
        Self {
            root:           None,
            name:           None,
            query:          None,
            all_extensions: false,
            case:           CaseSensitivity::Sensitive,
            threads:        num_cpus(),
            target_units:   None,
            timeout:        DEFAULT_TIMEOUT,
            cancel:         CancelToken::new(),
            collect_errors: false,
        }
    }
}

impl SearchBuilder {
    // ── Root ──────────────────────────────────────────────────────────────

    /// Directory (or single file) to search. Required.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    // ── Query ─────────────────────────────────────────────────────────────

    /// Filename to look for.
    ///
    /// A name without a `.` matches on stem, so `report` finds
    /// `report.pdf` and `report.txt`. A name with an extension must match
    /// exactly unless [`match_all_extensions`](Self::match_all_extensions)
    /// is set.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Ignore extensions: compare only the part before the first `.`.
    pub fn match_all_extensions(mut self, yes: bool) -> Self {
        self.all_extensions = yes;
        self
    }

    /// Compare names case-insensitively. Off by default.
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case = if yes {
            CaseSensitivity::Insensitive
        } else {
            CaseSensitivity::Sensitive
        };
        self
    }

    /// Use a prebuilt [`Query`]. Takes precedence over `.name()` and the
    /// mode and case options.
    pub fn query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Number of worker threads.
    ///
    /// Defaults to the number of logical CPU cores.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = n;
        self
    }

    /// How many work units the partitioner aims for.
    ///
    /// Defaults to twice the thread count. The real count can be lower for
    /// shallow trees and a little higher when the last expanded directory
    /// overshoots.
    pub fn target_units(mut self, n: usize) -> Self {
        self.target_units = Some(n);
        self
    }

    /// Global ceiling on the parallel phase. When it passes, the search
    /// returns what it has with [`Outcome::TimedOut`](crate::Outcome).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Share a cancellation token. Cancelling it ends the search early with
    /// [`Outcome::Interrupted`](crate::Outcome).
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Collect non-fatal errors into [`SearchResult::errors`].
    ///
    /// Disabled by default. Unreadable entries are always skipped; this only
    /// controls whether the errors are kept.
    pub fn collect_errors(mut self, yes: bool) -> Self {
        self.collect_errors = yes;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Execute the search and return results.
    ///
    /// Blocks until every unit is done, the timeout fires, or the token is
    /// cancelled. The reported duration covers the parallel phase only;
    /// partitioning is timed separately in
    /// [`ScanStats::partition_duration`].
    ///
    /// # Errors
    ///
    /// Returns `Err` before touching the filesystem for an invalid query or
    /// thread count, and for an unusable root. Timeouts and interrupts are
    /// not errors.
    pub fn run(self) -> Result<SearchResult, SearchError> {
        let root = self.root.ok_or(SearchError::MissingRoot)?;

        let query = match self.query {
            Some(q) => q,
            None => {
                let name = self.name.ok_or(SearchError::EmptyQuery)?;
                Query::from_input(name, self.all_extensions, self.case)?
            }
        };

        if self.threads == 0 {
            return Err(SearchError::InvalidThreadCount(0));
        }

        let target = self
            .target_units
            .unwrap_or(self.threads.saturating_mul(UNITS_PER_THREAD));

        info!(
            root = %root.display(),
            name = query.name(),
            mode = ?query.mode(),
            threads = self.threads,
            target,
            "Starting search"
        );

        let part  = partition(&root, target, Arc::new(query), &self.cancel)?;
        let units = part.units.len();

        let config = PoolConfig {
            threads:        self.threads,
            timeout:        self.timeout,
            collect_errors: self.collect_errors,
        };
        let mut done = dispatch(part.units, &config, &self.cancel)?;

        // Completion order is arbitrary; sort for a stable report.
        done.matches.sort_unstable();

        Ok(SearchResult {
            matches: done.matches,
            stats: ScanStats::compute(
                done.files,
                done.dirs,
                done.skipped,
                units,
                done.duration,
                part.duration,
            ),
            outcome: done.outcome,
            errors:  done.errors,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Get the logical CPU count, with a safe fallback.
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
