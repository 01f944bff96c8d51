use std::path::{Path, PathBuf};
use std::sync::Arc;

use saem_client::{DocumentFetcher, SenseClient};
use saem_config::batch::default_workers;
use saem_types::{FetchOutcome, FieldPolicy};
use tokio::io::AsyncWriteExt;
use tokio::task::JoinSet;

use crate::progress::{NoProgress, ProgressObserver};
use crate::report::BatchReport;

/// One batch of identifiers to download.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub sense_nos: Vec<String>,
    pub workers: usize,
    pub policy: FieldPolicy,
    /// Records are serialized here as a single JSON array when set.
    pub output_file: Option<PathBuf>,
    /// Failures are appended here as `B <id>` / `N <id>` lines when set.
    pub err_file: Option<PathBuf>,
}

impl BatchJob {
    pub fn new(sense_nos: Vec<String>) -> Self {
        Self {
            sense_nos,
            workers: default_workers(),
            policy: FieldPolicy::all(),
            output_file: None,
            err_file: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to write {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Runs the extraction client over identifier batches on a worker pool.
pub struct BatchDownloader<F> {
    client: Arc<SenseClient<F>>,
    observer: Arc<dyn ProgressObserver>,
}

impl<F: DocumentFetcher + 'static> BatchDownloader<F> {
    pub fn new(client: SenseClient<F>) -> Self {
        Self {
            client: Arc::new(client),
            observer: Arc::new(NoProgress),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Download every identifier in the job and classify the outcomes.
    ///
    /// Returns only after every dispatched task has finished; no partial
    /// results, no identifier dropped.
    pub async fn run(&self, job: BatchJob) -> Result<BatchReport, BatchError> {
        let total = job.sense_nos.len();
        self.observer.on_start(total);

        let outcomes = self.collect_outcomes(&job, total).await;

        let mut report = BatchReport::default();
        for outcome in outcomes {
            match outcome {
                FetchOutcome::Success(record) => report.records.push(*record),
                FetchOutcome::Blank(sense_no) => report.blank.push(sense_no),
                FetchOutcome::Network(sense_no) => report.network.push(sense_no),
            }
        }

        tracing::info!(
            fetched = report.records.len(),
            blank = report.blank.len(),
            network = report.network.len(),
            ratio = report.ratio(),
            "batch finished"
        );

        if let Some(path) = &job.err_file {
            write_failure_sink(path, &report).await?;
        }
        if let Some(path) = &job.output_file {
            write_success_sink(path, &report).await?;
        }

        self.observer.on_finish(&report);
        Ok(report)
    }

    async fn collect_outcomes(&self, job: &BatchJob, total: usize) -> Vec<FetchOutcome> {
        let workers = job.workers.clamp(1, total.max(1));

        let (task_tx, task_rx) = kanal::unbounded_async::<String>();
        let (outcome_tx, outcome_rx) = kanal::bounded_async::<FetchOutcome>(256);

        // The whole identifier list is known up front; queue it all before
        // the pool starts, then close the channel so workers drain and stop.
        for sense_no in &job.sense_nos {
            if task_tx.send(sense_no.clone()).await.is_err() {
                break;
            }
        }
        drop(task_tx);

        let mut pool = JoinSet::new();
        for _ in 0..workers {
            let task_rx = task_rx.clone();
            let outcome_tx = outcome_tx.clone();
            let client = Arc::clone(&self.client);
            let policy = job.policy.clone();

            pool.spawn(async move {
                while let Ok(sense_no) = task_rx.recv().await {
                    let outcome = client.fetch_sense(&sense_no, &policy).await;
                    if outcome_tx.send(outcome).await.is_err() {
                        break;
                    }
                }
            });
        }
        drop(task_rx);
        drop(outcome_tx);

        let mut outcomes = Vec::with_capacity(total);
        while let Ok(outcome) = outcome_rx.recv().await {
            self.observer.on_item(&outcome);
            outcomes.push(outcome);
        }

        // Barrier: the run never resolves with tasks still in flight.
        while let Some(joined) = pool.join_next().await {
            if let Err(err) = joined {
                tracing::error!("batch worker panicked: {err}");
            }
        }

        outcomes
    }
}

async fn write_failure_sink(path: &Path, report: &BatchReport) -> Result<(), BatchError> {
    let mut lines = String::new();
    for sense_no in &report.blank {
        lines.push_str(&format!("B {sense_no}\n"));
    }
    for sense_no in &report.network {
        lines.push_str(&format!("N {sense_no}\n"));
    }

    let sink_err = |source| BatchError::Sink {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .await
        .map_err(sink_err)?;
    file.write_all(lines.as_bytes()).await.map_err(sink_err)?;
    file.flush().await.map_err(sink_err)?;
    Ok(())
}

async fn write_success_sink(path: &Path, report: &BatchReport) -> Result<(), BatchError> {
    // serde_json leaves non-ASCII alone, so Hangul lands in the file as is.
    let json = serde_json::to_string(&report.records)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| BatchError::Sink {
            path: path.to_path_buf(),
            source,
        })
}
