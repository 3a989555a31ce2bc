use crate::error::IngestError;
use crate::types::ScanContext;

/// Synchronous unit of scanning work, run on the blocking pool.
///
/// Implementations should poll [`ScanContext::should_stop`] between files so
/// cancellation and the "enough" flag take effect promptly.
pub trait Scanner<J, T>: Send + Sync {
    fn scan(&self, job: J, ctx: &ScanContext) -> Result<Vec<T>, IngestError>;
}
