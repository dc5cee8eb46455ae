use std::time::Duration;

use crate::entry::MatchRecord;
use crate::error::SearchError;

/// The output of a search.
///
/// `matches` is sorted by directory, then filename. When [`outcome`](Self::outcome)
/// is not [`Outcome::Complete`] the list is a subset of the full answer and
/// its length is only a lower bound.
#[derive(Debug)]
pub struct SearchResult {
    /// Every located file, sorted.
    pub matches: Vec<MatchRecord>,

    /// Scan performance statistics.
    pub stats: ScanStats,

    /// Whether every unit ran to completion.
    pub outcome: Outcome,

    /// Non-fatal errors encountered during the search (permission denied, etc.).
    /// Only populated if `.collect_errors(true)` was set on the builder.
    pub errors: Vec<SearchError>,
}

impl SearchResult {
    /// Wall-clock seconds spent in the parallel phase.
    pub fn elapsed_secs(&self) -> f64 {
        self.stats.duration.as_secs_f64()
    }

    pub fn is_complete(&self) -> bool {
        self.outcome == Outcome::Complete
    }
}

/// How a search ended. Neither early ending is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// All units were walked.
    Complete,

    /// The global timeout fired; `incomplete` units did not finish.
    TimedOut { incomplete: usize },

    /// The caller cancelled; `incomplete` units did not finish.
    Interrupted { incomplete: usize },
}

impl Outcome {
    /// Number of units that did not finish.
    pub fn incomplete(&self) -> usize {
        match *self {
            Self::Complete => 0,
            Self::TimedOut { incomplete } | Self::Interrupted { incomplete } => incomplete,
        }
    }
}

/// Performance statistics for a search.
#[derive(Debug, Clone)]
pub struct ScanStats {
    /// Non-directory entries checked against the query.
    pub files: usize,

    /// Directories walked into.
    pub dirs: usize,

    /// Entries skipped because they could not be read.
    pub skipped: usize,

    /// Number of work units the root was split into.
    pub units: usize,

    /// Wall-clock time of the dispatch phase. Partitioning is not included.
    pub duration: Duration,

    /// Wall-clock time spent partitioning before dispatch.
    pub partition_duration: Duration,

    /// Total entries scanned per second. Convenience field, equals
    /// `(files + dirs) / duration.as_secs_f64()`, clamped to 0 on
    /// zero-duration runs.
    pub entries_per_sec: usize,
}

impl ScanStats {
    /// Compute `entries_per_sec` from raw counts and duration.
    pub(crate) fn compute(
        files: usize,
        dirs: usize,
        skipped: usize,
        units: usize,
        duration: Duration,
        partition_duration: Duration,
    ) -> Self {
        let total = files + dirs;
        let eps = if duration.as_secs_f64() > 0.0 {
            (total as f64 / duration.as_secs_f64()) as usize
        } else {
            0
        };
        Self {
            files,
            dirs,
            skipped,
            units,
            duration,
            partition_duration,
            entries_per_sec: eps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_is_zero_for_zero_duration() {
        let s = ScanStats::compute(10, 5, 0, 3, Duration::ZERO, Duration::ZERO);
        assert_eq!(s.entries_per_sec, 0);
    }

    #[test]
    fn rate_uses_files_and_dirs() {
        let s = ScanStats::compute(150, 50, 1, 4, Duration::from_secs(2), Duration::ZERO);
        assert_eq!(s.entries_per_sec, 100);
    }

    #[test]
    fn incomplete_counts() {
        assert_eq!(Outcome::Complete.incomplete(), 0);
        assert_eq!(Outcome::TimedOut { incomplete: 3 }.incomplete(), 3);
        assert_eq!(Outcome::Interrupted { incomplete: 1 }.incomplete(), 1);
    }
}
