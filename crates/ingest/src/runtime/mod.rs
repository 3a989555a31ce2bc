use std::sync::{Arc, Mutex};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::traits::Scanner;
use crate::types::{EnoughFlag, RuntimeConfig, ScanContext, ScanOutcome, ScanStats};

pub mod flow_control;

pub use flow_control::{FlowControlConfig, FlowController};

pub type DynScanner<J, T> = Arc<dyn Scanner<J, T> + Send + Sync>;

enum JobOutcome {
    Completed,
    Failed,
    Skipped,
}

/// Runs scan jobs concurrently, bounded by the flow controller, and gathers
/// their results into one shared sink.
pub struct ScanRuntime<J, T>
where
    J: Send + 'static,
    T: Send + 'static,
{
    scanner: DynScanner<J, T>,
    flow: FlowController,
    result_target: usize,
}

impl<J, T> ScanRuntime<J, T>
where
    J: Send + 'static,
    T: Send + 'static,
{
    pub fn new(config: RuntimeConfig, scanner: DynScanner<J, T>) -> Self {
        Self {
            scanner,
            flow: FlowController::new(&FlowControlConfig::from(&config)),
            result_target: config.result_target,
        }
    }

    /// Scans every job unless the result target is reached first.
    ///
    /// A failing job is logged and skipped. When `cancel` fires, all tasks
    /// are drained before `IngestError::Cancelled` is returned, so nothing
    /// outlives the call.
    pub async fn run(
        &self,
        jobs: Vec<J>,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome<T>, IngestError> {
        let enough = EnoughFlag::new(self.result_target);
        let sink: Arc<Mutex<Vec<T>>> = Arc::new(Mutex::new(Vec::new()));
        let mut stats = ScanStats {
            scheduled: jobs.len(),
            ..ScanStats::default()
        };

        let mut tasks = JoinSet::new();
        for job in jobs {
            let ctx = ScanContext {
                cancel: cancel.clone(),
                enough: enough.clone(),
            };
            let flow = self.flow.clone();
            let scanner = Arc::clone(&self.scanner);
            let sink = Arc::clone(&sink);
            tasks.spawn(run_job(job, ctx, flow, scanner, sink));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(JobOutcome::Completed)) => stats.completed += 1,
                Ok(Ok(JobOutcome::Failed)) => stats.failed += 1,
                Ok(Ok(JobOutcome::Skipped)) => stats.skipped += 1,
                Ok(Err(e)) => {
                    tasks.abort_all();
                    while tasks.join_next().await.is_some() {}
                    return Err(e);
                }
                Err(e) if e.is_cancelled() => stats.skipped += 1,
                Err(e) => {
                    tasks.abort_all();
                    while tasks.join_next().await.is_some() {}
                    return Err(IngestError::Join(e.to_string()));
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(IngestError::Cancelled);
        }

        let items = std::mem::take(
            &mut *sink
                .lock()
                .map_err(|_| IngestError::Execution("scan result sink poisoned".to_string()))?,
        );
        debug!(
            items = items.len(),
            completed = stats.completed,
            failed = stats.failed,
            skipped = stats.skipped,
            "scan finished"
        );
        Ok(ScanOutcome { items, stats })
    }
}

async fn run_job<J, T>(
    job: J,
    ctx: ScanContext,
    flow: FlowController,
    scanner: DynScanner<J, T>,
    sink: Arc<Mutex<Vec<T>>>,
) -> Result<JobOutcome, IngestError>
where
    J: Send + 'static,
    T: Send + 'static,
{
    let _permit = tokio::select! {
        _ = ctx.cancel.cancelled() => return Ok(JobOutcome::Skipped),
        permit = flow.acquire_in_flight() => permit?,
    };
    if ctx.should_stop() {
        return Ok(JobOutcome::Skipped);
    }

    let enough = ctx.enough.clone();
    let scanned = tokio::task::spawn_blocking(move || scanner.scan(job, &ctx))
        .await
        .map_err(|e| IngestError::Join(e.to_string()))?;

    match scanned {
        Ok(items) => {
            let n = items.len();
            sink.lock()
                .map_err(|_| IngestError::Execution("scan result sink poisoned".to_string()))?
                .extend(items);
            enough.add(n);
            Ok(JobOutcome::Completed)
        }
        Err(IngestError::Cancelled) => Ok(JobOutcome::Skipped),
        Err(e) => {
            warn!("scan job failed: {e}");
            Ok(JobOutcome::Failed)
        }
    }
}
