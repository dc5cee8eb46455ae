use std::path::Path;

use ignore::{DirEntry, WalkBuilder};
use tracing::debug;

use crate::cancel::StopSignal;
use crate::entry::{MatchRecord, UnitKind, WorkUnit};
use crate::error::{from_walk_error, SearchError};
use crate::traits::Matcher;

/// What one worker found in one unit.
#[derive(Debug, Default)]
pub(crate) struct UnitReport {
    pub matches:  Vec<MatchRecord>,
    pub files:    usize,
    pub dirs:     usize,
    pub skipped:  usize,
    pub errors:   Vec<SearchError>,
    /// `false` when the walk stopped on a stop signal before the end.
    pub finished: bool,
}

/// Walk one unit and collect every matching filename beneath it.
///
/// The stop signal is checked before every entry; once it fires the report
/// holds whatever was matched so far and `finished` is `false`. Unreadable
/// entries are counted in `skipped` and never end the walk.
pub(crate) fn traverse(unit: &WorkUnit, stop: &StopSignal, collect_errors: bool) -> UnitReport {
    let mut report = UnitReport::default();

    if stop.requested() {
        return report;
    }

    match unit.kind {
        UnitKind::File => {
            report.files = 1;
            if let Some(rec) = check(&unit.path, &*unit.query) {
                report.matches.push(rec);
            }
            report.finished = true;
        }
        UnitKind::Directory => walk_dir(&unit.path, &*unit.query, stop, collect_errors, &mut report),
    }

    report
}

fn walk_dir(
    root: &Path,
    matcher: &dyn Matcher,
    stop: &StopSignal,
    collect_errors: bool,
    report: &mut UnitReport,
) {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .ignore(false)
        .parents(false)
        .hidden(false)
        .follow_links(false)
        .same_file_system(false)
        .build();

    for res in walker {
        if stop.requested() {
            debug!(path = %root.display(), matched = report.matches.len(), "Walk stopped early");
            return;
        }

        let entry: DirEntry = match res {
            Ok(e) => e,
            Err(e) => {
                report.skipped += 1;
                let err = from_walk_error(e);
                debug!(error = %err, "Skipping unreadable entry");
                if collect_errors {
                    report.errors.push(err);
                }
                continue;
            }
        };

        let Some(ft) = entry.file_type() else {
            continue;
        };

        if ft.is_dir() {
            report.dirs += 1;
            continue;
        }

        report.files += 1;
        if let Some(rec) = check(entry.path(), matcher) {
            report.matches.push(rec);
        }
    }

    report.finished = true;
}

fn check(path: &Path, matcher: &dyn Matcher) -> Option<MatchRecord> {
    let name = path.file_name()?;
    // Lossy: non-UTF-8 bytes become U+FFFD.
    if matcher.is_match(&name.to_string_lossy()) {
        MatchRecord::from_path(path)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{MatchMode, Query};
    use crate::cancel::CancelToken;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Accepts every name and cancels `token` on its `after`-th call.
    struct CancelAfter {
        calls: AtomicUsize,
        after: usize,
        token: CancelToken,
    }

    impl Matcher for CancelAfter {
        fn is_match(&self, _filename: &str) -> bool {
            if self.calls.fetch_add(1, Ordering::SeqCst) + 1 == self.after {
                self.token.cancel();
            }
            true
        }
    }

    fn unit(kind: UnitKind, path: &Path, name: &str, mode: MatchMode) -> WorkUnit {
        WorkUnit {
            kind,
            path:  path.to_path_buf(),
            query: Arc::new(Query::new(name, mode).unwrap()),
        }
    }

    fn setup() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.txt"), "").unwrap();
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("sub/a.txt"), "").unwrap();
        fs::write(root.join("sub/a.csv"), "").unwrap();
        fs::write(root.join("sub/deeper/a.txt"), "").unwrap();
        dir
    }

    #[test]
    fn walks_whole_subtree() {
        let dir = setup();
        let u = unit(UnitKind::Directory, dir.path(), "a.txt", MatchMode::Exact);
        let report = traverse(&u, &StopSignal::default(), false);

        assert!(report.finished);
        assert_eq!(report.matches.len(), 3);
        assert_eq!(report.files, 4);
        // root, sub, sub/deeper
        assert_eq!(report.dirs, 3);
    }

    #[test]
    fn file_unit_checks_itself() {
        let dir = setup();
        let path = dir.path().join("sub/a.csv");

        let stop = StopSignal::default();
        let hit = traverse(&unit(UnitKind::File, &path, "a", MatchMode::StemOnly), &stop, false);
        assert_eq!(hit.matches, vec![MatchRecord::from_path(&path).unwrap()]);

        let miss = traverse(&unit(UnitKind::File, &path, "a.txt", MatchMode::Exact), &stop, false);
        assert!(miss.matches.is_empty());
        assert!(miss.finished);
    }

    #[test]
    fn directory_names_are_not_candidates() {
        let dir = setup();
        let u = unit(UnitKind::Directory, dir.path(), "sub", MatchMode::StemOnly);
        let report = traverse(&u, &StopSignal::default(), false);
        assert!(report.matches.is_empty());
    }

    #[test]
    fn stopped_walk_returns_unfinished() {
        let dir = setup();
        let stop = StopSignal::default();
        stop.halt.cancel();
        let u = unit(UnitKind::Directory, dir.path(), "a.txt", MatchMode::Exact);
        let report = traverse(&u, &stop, false);
        assert!(!report.finished);
        assert!(report.matches.is_empty());
    }

    #[test]
    fn stops_between_entries_once_signalled() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..200 {
            fs::write(dir.path().join(format!("f{i}.txt")), "").unwrap();
        }

        let stop = StopSignal::default();
        let matcher = CancelAfter {
            calls: AtomicUsize::new(0),
            after: 3,
            token: stop.interrupt.clone(),
        };
        let mut report = UnitReport::default();
        walk_dir(dir.path(), &matcher, &stop, false, &mut report);

        assert!(!report.finished);
        assert_eq!(report.files, 3);
        assert_eq!(report.matches.len(), 3);
        assert_eq!(matcher.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn missing_directory_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let u = unit(UnitKind::Directory, &dir.path().join("gone"), "a.txt", MatchMode::Exact);
        let report = traverse(&u, &StopSignal::default(), true);
        assert!(report.finished);
        assert!(report.matches.is_empty());
        assert_eq!(report.skipped, 1);
        assert!(report.errors.iter().all(SearchError::is_recoverable));
    }
}
