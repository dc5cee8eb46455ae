use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, info, warn};

use crate::cancel::{CancelToken, StopSignal};
use crate::entry::{MatchRecord, WorkUnit};
use crate::error::SearchError;
use crate::results::Outcome;
use crate::walker::{traverse, UnitReport};

/// Longest the dispatcher sleeps before re-checking the interrupt token.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Per-unit work run on a pool thread.
type UnitFn = dyn Fn(&WorkUnit, &StopSignal, bool) -> UnitReport + Send + Sync;

// ---------------------------------------------------------------------------
// PoolConfig
// ---------------------------------------------------------------------------

/// Pool parameters passed from the builder to the dispatcher.
///
/// Not part of the public API. Callers configure these
/// via the builder methods (`.threads()`, `.timeout()`, `.collect_errors()`).
#[derive(Debug, Clone)]
pub(crate) struct PoolConfig {
    pub threads:        usize,
    pub timeout:        Duration,
    pub collect_errors: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Merged output of every unit that reported back.
#[derive(Debug)]
pub(crate) struct Dispatch {
    /// Unordered bag of matches across all units.
    pub matches:  Vec<MatchRecord>,
    pub files:    usize,
    pub dirs:     usize,
    pub skipped:  usize,
    pub errors:   Vec<SearchError>,
    pub outcome:  Outcome,
    pub duration: Duration,
}

impl Dispatch {
    fn empty() -> Self {
        Self {
            matches:  Vec::new(),
            files:    0,
            dirs:     0,
            skipped:  0,
            errors:   Vec::new(),
            outcome:  Outcome::Complete,
            duration: Duration::ZERO,
        }
    }

    fn absorb(&mut self, report: UnitReport) {
        self.matches.extend(report.matches);
        self.files   += report.files;
        self.dirs    += report.dirs;
        self.skipped += report.skipped;
        self.errors.extend(report.errors);
    }
}

/// Why the wait loop ended.
enum Ended {
    AllReported,
    TimedOut,
    Interrupted,
    WorkersGone,
}

// ---------------------------------------------------------------------------
// dispatch()
// ---------------------------------------------------------------------------

/// Fan `units` out over a fixed pool of worker threads and merge what they find.
///
/// Each unit is queued once, so at most one worker handles it. The call
/// returns when every unit has reported, when `config.timeout` has elapsed,
/// or when `interrupt` is cancelled, whichever comes first. The last two
/// return the matches collected so far with a non-complete [`Outcome`].
///
/// On an early return the workers are told to stop but are not joined; each
/// one exits at its next entry. That keeps a worker stuck inside a slow
/// syscall from holding the caller past the deadline.
///
/// # Errors
///
/// [`SearchError::InvalidThreadCount`] for a zero-sized pool, and
/// [`SearchError::ThreadPool`] when a worker cannot be spawned or every
/// worker died before finishing.
pub(crate) fn dispatch(
    units: Vec<WorkUnit>,
    config: &PoolConfig,
    interrupt: &CancelToken,
) -> Result<Dispatch, SearchError> {
    let walk: Arc<UnitFn> = Arc::new(traverse);
    run_pool(units, config, interrupt, walk)
}

fn run_pool(
    units: Vec<WorkUnit>,
    config: &PoolConfig,
    interrupt: &CancelToken,
    walk: Arc<UnitFn>,
) -> Result<Dispatch, SearchError> {
    if config.threads == 0 {
        return Err(SearchError::InvalidThreadCount(0));
    }

    let total = units.len();
    if total == 0 {
        return Ok(Dispatch::empty());
    }

    let start = Instant::now();
    let stop  = StopSignal {
        interrupt: interrupt.clone(),
        halt:      CancelToken::new(),
    };

    let (job_tx, job_rx) = unbounded::<WorkUnit>();
    for unit in units {
        // The receiver is alive in this scope, so send cannot fail.
        let _ = job_tx.send(unit);
    }
    drop(job_tx);

    let (res_tx, res_rx) = unbounded::<UnitReport>();
    let threads = config.threads.min(total);

    info!(units = total, threads, timeout_secs = config.timeout.as_secs(), "Dispatching search");

    let mut handles = Vec::with_capacity(threads);
    for id in 0..threads {
        let worker = spawn_worker(
            id,
            job_rx.clone(),
            res_tx.clone(),
            stop.clone(),
            Arc::clone(&walk),
            config.collect_errors,
        );
        match worker {
            Ok(h) => handles.push(h),
            Err(e) => {
                stop.halt.cancel();
                return Err(SearchError::ThreadPool(e.to_string()));
            }
        }
    }
    // Only workers hold senders now; disconnection means they all exited.
    drop(res_tx);
    drop(job_rx);

    let deadline = start.checked_add(config.timeout);
    let mut out      = Dispatch::empty();
    let mut received = 0;
    let mut finished = 0;

    let ended = loop {
        if received == total {
            break Ended::AllReported;
        }
        if interrupt.is_cancelled() {
            break Ended::Interrupted;
        }

        let wait = match deadline {
            Some(d) => {
                let now = Instant::now();
                if now >= d {
                    break Ended::TimedOut;
                }
                (d - now).min(POLL_INTERVAL)
            }
            None => POLL_INTERVAL,
        };

        match res_rx.recv_timeout(wait) {
            Ok(report) => {
                received += 1;
                if report.finished {
                    finished += 1;
                }
                out.absorb(report);
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break Ended::WorkersGone,
        }
    };

    match ended {
        Ended::AllReported => {
            join_workers(handles);
        }
        Ended::WorkersGone => {
            join_workers(handles);
            return Err(SearchError::ThreadPool(format!(
                "all workers exited with {} of {} units unreported",
                total - received,
                total
            )));
        }
        Ended::TimedOut | Ended::Interrupted => {
            stop.halt.cancel();
            // Workers are detached; keep whatever they already sent.
            drop(handles);
            for report in res_rx.try_iter() {
                if report.finished {
                    finished += 1;
                }
                out.absorb(report);
            }
        }
    }

    let incomplete = total - finished;
    out.outcome = match ended {
        Ended::TimedOut => {
            warn!(incomplete, "Search timed out");
            Outcome::TimedOut { incomplete }
        }
        Ended::Interrupted => {
            info!(incomplete, "Search interrupted");
            Outcome::Interrupted { incomplete }
        }
        // Every unit reported, but some were cut short by the interrupt.
        Ended::AllReported if incomplete > 0 => {
            info!(incomplete, "Search interrupted");
            Outcome::Interrupted { incomplete }
        }
        _ => Outcome::Complete,
    };
    out.duration = start.elapsed();

    info!(
        matches = out.matches.len(),
        files = out.files,
        dirs = out.dirs,
        skipped = out.skipped,
        duration_ms = out.duration.as_millis() as u64,
        "Dispatch finished"
    );

    Ok(out)
}

fn spawn_worker(
    id: usize,
    jobs: Receiver<WorkUnit>,
    results: Sender<UnitReport>,
    stop: StopSignal,
    walk: Arc<UnitFn>,
    collect_errors: bool,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("parfind-worker-{id}"))
        .spawn(move || {
            let mut done = 0usize;
            for unit in jobs.iter() {
                if stop.requested() {
                    break;
                }
                let report = walk(&unit, &stop, collect_errors);
                done += 1;
                if results.send(report).is_err() {
                    break;
                }
            }
            debug!(worker = id, units = done, "Worker exiting");
        })
}

fn join_workers(handles: Vec<JoinHandle<()>>) {
    for h in handles {
        if h.join().is_err() {
            warn!("Worker panicked");
        }
    }
}
