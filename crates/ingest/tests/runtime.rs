use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use burrow_ingest::{IngestError, RuntimeConfig, ScanContext, ScanRuntime, Scanner};
use tokio_util::sync::CancellationToken;

fn config(max_in_flight: usize, result_target: usize) -> RuntimeConfig {
    RuntimeConfig {
        max_in_flight,
        result_target,
    }
}

#[derive(Default)]
struct CountingScanner {
    live: AtomicUsize,
    peak: AtomicUsize,
}

impl Scanner<u32, u32> for CountingScanner {
    fn scan(&self, job: u32, _ctx: &ScanContext) -> Result<Vec<u32>, IngestError> {
        let now = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(5));
        self.live.fetch_sub(1, Ordering::SeqCst);
        Ok(vec![job, job])
    }
}

struct FailingScanner;

impl Scanner<u32, u32> for FailingScanner {
    fn scan(&self, job: u32, _ctx: &ScanContext) -> Result<Vec<u32>, IngestError> {
        if job == 1 {
            return Err(IngestError::Execution("unreadable file".to_string()));
        }
        Ok(vec![job])
    }
}

/// Spins until the request is cancelled, tracking how many scans are alive.
#[derive(Default)]
struct BlockingScanner {
    live: AtomicUsize,
    started: AtomicUsize,
}

impl Scanner<u32, u32> for BlockingScanner {
    fn scan(&self, _job: u32, ctx: &ScanContext) -> Result<Vec<u32>, IngestError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);
        while !ctx.should_stop() {
            std::thread::sleep(Duration::from_millis(1));
        }
        self.live.fetch_sub(1, Ordering::SeqCst);
        Err(IngestError::Cancelled)
    }
}

#[tokio::test]
async fn concurrency_never_exceeds_the_limit() {
    let scanner = Arc::new(CountingScanner::default());
    let runtime: ScanRuntime<u32, u32> = ScanRuntime::new(config(3, usize::MAX), scanner.clone());

    let outcome = runtime
        .run((0..20).collect(), &CancellationToken::new())
        .await
        .expect("scan should succeed");

    assert_eq!(outcome.items.len(), 40);
    assert_eq!(outcome.stats.completed, 20);
    assert!(scanner.peak.load(Ordering::SeqCst) <= 3);
}

#[tokio::test]
async fn enough_flag_short_circuits_remaining_jobs() {
    let scanner = Arc::new(CountingScanner::default());
    let runtime: ScanRuntime<u32, u32> = ScanRuntime::new(config(1, 3), scanner);

    let outcome = runtime
        .run((0..10).collect(), &CancellationToken::new())
        .await
        .expect("reaching the target is not an error");

    assert_eq!(outcome.items.len(), 4);
    assert_eq!(outcome.stats.completed, 2);
    assert_eq!(outcome.stats.skipped, 8);
}

#[tokio::test]
async fn failing_job_is_isolated() {
    let runtime: ScanRuntime<u32, u32> = ScanRuntime::new(config(4, usize::MAX), Arc::new(FailingScanner));

    let mut outcome = runtime
        .run(vec![0, 1, 2], &CancellationToken::new())
        .await
        .expect("one failure should not abort the scan");
    outcome.items.sort();

    assert_eq!(outcome.items, vec![0, 2]);
    assert_eq!(outcome.stats.failed, 1);
}

#[tokio::test]
async fn cancellation_returns_error_and_drains_tasks() {
    let scanner = Arc::new(BlockingScanner::default());
    let runtime: ScanRuntime<u32, u32> = ScanRuntime::new(config(2, usize::MAX), scanner.clone());
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    let watcher = scanner.clone();
    tokio::spawn(async move {
        while watcher.started.load(Ordering::SeqCst) < 2 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        trigger.cancel();
    });

    let err = runtime
        .run((0..6).collect(), &cancel)
        .await
        .expect_err("cancelled scan must fail");

    assert!(err.is_cancelled());
    assert_eq!(scanner.live.load(Ordering::SeqCst), 0);
    assert!(scanner.started.load(Ordering::SeqCst) <= 6);
}
