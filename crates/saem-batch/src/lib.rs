pub mod downloader;
pub mod progress;
pub mod report;

pub use downloader::{BatchDownloader, BatchError, BatchJob};
pub use progress::{NoProgress, ProgressObserver};
pub use report::BatchReport;
