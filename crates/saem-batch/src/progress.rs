use saem_types::FetchOutcome;

use crate::report::BatchReport;

/// Observes a batch run without taking part in its control flow.
///
/// Called from the collection loop only, never concurrently.
pub trait ProgressObserver: Send + Sync {
    fn on_start(&self, _total: usize) {}
    fn on_item(&self, _outcome: &FetchOutcome) {}
    fn on_finish(&self, _report: &BatchReport) {}
}

/// Silent default.
pub struct NoProgress;

impl ProgressObserver for NoProgress {}
