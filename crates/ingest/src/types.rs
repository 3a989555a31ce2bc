use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub max_in_flight: usize,
    /// Number of results after which remaining jobs are skipped.
    pub result_target: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 8,
            result_target: 100,
        }
    }
}

/// Shared best-effort "collected enough" signal.
///
/// Once set it stays set. Jobs already running may still finish and report.
#[derive(Debug, Clone)]
pub struct EnoughFlag {
    count: Arc<AtomicUsize>,
    done: Arc<AtomicBool>,
    target: usize,
}

impl EnoughFlag {
    pub fn new(target: usize) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            done: Arc::new(AtomicBool::new(target == 0)),
            target,
        }
    }

    /// Records `n` more results; returns true once the target is reached.
    pub fn add(&self, n: usize) -> bool {
        let total = self.count.fetch_add(n, Ordering::AcqRel) + n;
        if total >= self.target {
            self.done.store(true, Ordering::Release);
        }
        self.is_set()
    }

    pub fn set(&self) {
        self.done.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}

/// What a running scanner can observe about the surrounding request.
#[derive(Debug, Clone)]
pub struct ScanContext {
    pub cancel: CancellationToken,
    pub enough: EnoughFlag,
}

impl ScanContext {
    pub fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.enough.is_set()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub scheduled: usize,
    pub completed: usize,
    pub failed: usize,
    /// Jobs that never ran because the target had been reached.
    pub skipped: usize,
}

#[derive(Debug)]
pub struct ScanOutcome<T> {
    pub items: Vec<T>,
    pub stats: ScanStats,
}
