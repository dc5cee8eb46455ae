//! Splitting the search root into independent work units.
//!
//! The root's immediate entries become units. While there are fewer units
//! than the requested target, the oldest unexpanded directory is replaced by
//! its own immediate entries (breadth-first, one level at a time). Every
//! directory is expanded at most once, so the loop ends even when the tree is
//! shallower than the target.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cancel::CancelToken;
use crate::entry::WorkUnit;
use crate::error::SearchError;
use crate::query::Query;

/// The units covering a search root, without overlap or gap.
#[derive(Debug)]
pub struct Partition {
    pub units: Vec<WorkUnit>,

    /// How many directories were replaced by their children.
    pub expanded: usize,

    /// Time spent enumerating.
    pub duration: Duration,
}

/// Partition `root` into roughly `target` units.
///
/// A non-directory root yields a single [`UnitKind::File`](crate::UnitKind)
/// unit. Subdirectories that cannot be listed stay whole as directory units;
/// the walk over them later reports zero matches instead of failing.
///
/// Expansion stops as soon as `cancel` fires. The units gathered so far
/// still cover the whole tree, only in fewer, larger pieces.
///
/// # Errors
///
/// [`SearchError::NotFound`] if `root` does not exist, and
/// [`SearchError::Root`] if it is a directory that cannot be listed.
pub fn partition(
    root: &Path,
    target: usize,
    query: Arc<Query>,
    cancel: &CancelToken,
) -> Result<Partition, SearchError> {
    let start = Instant::now();

    // The root itself may be a link; follow it.
    let meta = fs::metadata(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SearchError::NotFound(root.to_path_buf()),
        _ => SearchError::Root { path: root.to_path_buf(), source: e },
    })?;

    if !meta.is_dir() {
        return Ok(Partition {
            units:    vec![WorkUnit::file(root.to_path_buf(), query)],
            expanded: 0,
            duration: start.elapsed(),
        });
    }

    let mut settled:  Vec<WorkUnit>     = Vec::new();
    let mut frontier: VecDeque<PathBuf> = VecDeque::new();

    // The root is always expanded, whatever the target.
    let children = list(root).map_err(|source| SearchError::Root {
        path: root.to_path_buf(),
        source,
    })?;
    let mut expanded = 1;
    sort_children(children, &query, &mut settled, &mut frontier);

    while settled.len() + frontier.len() < target {
        if cancel.is_cancelled() {
            debug!(expanded, "Partitioning cancelled");
            break;
        }
        let Some(dir) = frontier.pop_front() else {
            break;
        };
        match list(&dir) {
            Ok(children) => {
                expanded += 1;
                sort_children(children, &query, &mut settled, &mut frontier);
            }
            Err(e) => {
                debug!(path = %dir.display(), error = %e, "Cannot expand, keeping whole");
                settled.push(WorkUnit::directory(dir, Arc::clone(&query)));
            }
        }
    }

    let mut units = settled;
    units.extend(
        frontier
            .into_iter()
            .map(|dir| WorkUnit::directory(dir, Arc::clone(&query))),
    );

    debug!(units = units.len(), expanded, target, "Partitioned search root");

    Ok(Partition {
        units,
        expanded,
        duration: start.elapsed(),
    })
}

/// An immediate child: its path and whether it is a real directory.
type Child = (PathBuf, bool);

/// List a directory's immediate entries. Entries that vanish or whose type
/// cannot be read are dropped; an error means the directory itself could
/// not be opened.
fn list(dir: &Path) -> std::io::Result<Vec<Child>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else { continue };
        // file_type() does not follow symlinks, matching the walker.
        let Ok(ft) = entry.file_type() else { continue };
        out.push((entry.path(), ft.is_dir()));
    }
    Ok(out)
}

fn sort_children(
    children: Vec<Child>,
    query: &Arc<Query>,
    settled: &mut Vec<WorkUnit>,
    frontier: &mut VecDeque<PathBuf>,
) {
    for (path, is_dir) in children {
        if is_dir {
            frontier.push_back(path);
        } else {
            settled.push(WorkUnit::file(path, Arc::clone(query)));
        }
    }
}
