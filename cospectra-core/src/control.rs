//! Run control: cooperative cancellation and progress reporting.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared flag that asks a running search to stop.
///
/// Clones observe the same flag. The search checks it before starting each
/// candidate, so work already in flight for a candidate always completes.
///
/// # Examples
/// ```
/// use cospectra_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Reports whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Snapshot of search progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Candidates fully evaluated and bucketed so far.
    pub processed: u64,
    /// Candidates in the complete enumeration.
    pub total: u64,
}

impl Progress {
    /// Returns the completed fraction in `0.0..=1.0`.
    ///
    /// An empty enumeration counts as complete.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        #[expect(
            clippy::cast_precision_loss,
            clippy::float_arithmetic,
            reason = "progress fractions tolerate rounding for very large counts"
        )]
        let fraction = self.processed as f64 / self.total as f64;
        fraction
    }
}

/// Receives progress snapshots after every evaluated chunk.
///
/// Sinks are called from the thread driving the search, never from worker
/// threads.
pub trait ProgressSink: Send + Sync {
    /// Observes a progress snapshot.
    fn report(&self, progress: Progress);
}

impl<F> ProgressSink for F
where
    F: Fn(Progress) + Send + Sync,
{
    fn report(&self, progress: Progress) {
        self(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn fraction_handles_empty_enumerations() {
        let empty = Progress {
            processed: 0,
            total: 0,
        };
        let half = Progress {
            processed: 5,
            total: 10,
        };
        assert!((empty.fraction() - 1.0).abs() < f64::EPSILON);
        assert!((half.fraction() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn closures_are_progress_sinks() {
        let seen = Mutex::new(Vec::new());
        let sink = |progress: Progress| {
            seen.lock().expect("mutex poisoned").push(progress.processed);
        };
        sink.report(Progress {
            processed: 3,
            total: 9,
        });
        assert_eq!(*seen.lock().expect("mutex poisoned"), vec![3]);
    }
}
