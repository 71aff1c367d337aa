//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use sentbench_eval::{ProviderStats, RunObserver};
use std::time::Duration;

/// Progress bar over all trials of a run
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            quiet,
        }
    }

    /// Initialize the bar for `total_trials` provider calls
    pub fn init_trials(&mut self, total_trials: u64) {
        if self.quiet {
            return;
        }

        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} trials {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");

        let pb = ProgressBar::new(total_trials);
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message("Complete");
        }
    }
}

impl RunObserver for ProgressReporter {
    fn provider_started(&self, _id: &str, name: &str, _records: usize) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(name.to_string());
        }
    }

    fn trial_finished(&self, _id: &str, _record_index: usize, _score: Option<f64>) {
        if let Some(pb) = &self.progress_bar {
            pb.inc(1);
        }
    }

    fn provider_finished(&self, stats: &ProviderStats) {
        if let Some(pb) = &self.progress_bar {
            let accuracy = stats
                .mean_accuracy()
                .map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"));
            pb.println(format!(
                "{}: accuracy {accuracy} ({} ok, {} failed)",
                stats.name,
                stats.successful_trials(),
                stats.failed_trials()
            ));
        }
    }
}
