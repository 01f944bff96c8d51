use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use saem_batch::{BatchReport, ProgressObserver};
use saem_types::FetchOutcome;

/// Renders batch progress as a bar on stderr.
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    pub fn stderr() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} [{elapsed_precise}]")
                .expect("statically valid template"),
        );
        Self { bar }
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_start(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_item(&self, _outcome: &FetchOutcome) {
        self.bar.inc(1);
    }

    fn on_finish(&self, _report: &BatchReport) {
        self.bar.finish_and_clear();
    }
}
