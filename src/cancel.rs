use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cooperative stop signal shared between the caller and the workers.
///
/// Cloning is cheap and every clone observes the same flag. Hand a clone to a
/// signal handler (or another thread) and call [`cancel`](Self::cancel) to end
/// a running search early; the search still returns what it collected.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// The pair of signals a worker polls: the caller's interrupt and the
/// dispatcher's own halt (raised on timeout).
#[derive(Debug, Clone, Default)]
pub(crate) struct StopSignal {
    pub interrupt: CancelToken,
    pub halt:      CancelToken,
}

impl StopSignal {
    pub fn requested(&self) -> bool {
        self.interrupt.is_cancelled() || self.halt.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn either_signal_stops() {
        let stop = StopSignal::default();
        assert!(!stop.requested());
        stop.halt.cancel();
        assert!(stop.requested());

        let stop = StopSignal::default();
        stop.interrupt.cancel();
        assert!(stop.requested());
    }
}
