//! Experiment runner
//!
//! Every provider is called once per corpus record. Each call is timed with
//! a wall clock, its output is scored against the record's ground truth, and
//! the result is folded into that provider's [`ProviderStats`].

use crate::constants::DEFAULT_WARMUP_RUNS;
use crate::corpus::Corpus;
use crate::error::{EvalError, Result};
use crate::provider::{ProviderRegistry, SegmentationProvider};
use crate::stats::{ProviderStats, ResultsTable, TrialFailure};
use sentbench_core::{Aligner, Normalization, Scorer};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Knobs for a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerOptions {
    /// Untimed warm-up calls per provider
    pub warmup_runs: usize,
    /// Abort on the first failed trial
    pub fail_fast: bool,
    /// Evaluate providers concurrently
    pub parallel: bool,
    /// Worker threads when parallel; `None` uses rayon's default
    pub threads: Option<usize>,
    /// Score normalization
    pub normalization: Normalization,
    /// Popular-character heuristic in the similarity ratio
    pub autojunk: bool,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            warmup_runs: DEFAULT_WARMUP_RUNS,
            fail_fast: false,
            parallel: false,
            threads: None,
            normalization: Normalization::default(),
            autojunk: true,
        }
    }
}

/// Callbacks for run progress
///
/// With parallel evaluation the callbacks arrive from several threads.
pub trait RunObserver: Sync {
    /// A provider is about to be evaluated on `records` records
    fn provider_started(&self, _id: &str, _name: &str, _records: usize) {}

    /// One trial finished, successfully or not
    fn trial_finished(&self, _id: &str, _record_index: usize, _score: Option<f64>) {}

    /// A provider is done
    fn provider_finished(&self, _stats: &ProviderStats) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {}

/// Runs providers over a corpus and collects statistics
#[derive(Debug, Clone)]
pub struct ExperimentRunner {
    options: RunnerOptions,
    scorer: Scorer,
}

impl ExperimentRunner {
    /// Create a runner
    pub fn new(options: RunnerOptions) -> Self {
        let scorer = Scorer::new()
            .with_normalization(options.normalization)
            .with_aligner(Aligner::new().with_autojunk(options.autojunk));
        Self { options, scorer }
    }

    /// Options in effect
    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    /// Evaluate every registered provider on the corpus
    pub fn run(&self, registry: &ProviderRegistry, corpus: &Corpus) -> Result<ResultsTable> {
        self.run_with_observer(registry, corpus, &SilentObserver)
    }

    /// Evaluate every registered provider, reporting progress to `observer`
    pub fn run_with_observer(
        &self,
        registry: &ProviderRegistry,
        corpus: &Corpus,
        observer: &dyn RunObserver,
    ) -> Result<ResultsTable> {
        log::info!(
            "Evaluating {} provider(s) on {} record(s)",
            registry.len(),
            corpus.len()
        );

        let providers: Vec<&dyn SegmentationProvider> = registry.iter().collect();

        let results = if self.options.parallel && providers.len() > 1 {
            self.evaluate_parallel(&providers, corpus, observer)?
        } else {
            providers
                .iter()
                .map(|provider| self.evaluate_provider(*provider, corpus, observer))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(results.into_iter().collect())
    }

    #[cfg(feature = "parallel")]
    fn evaluate_parallel(
        &self,
        providers: &[&dyn SegmentationProvider],
        corpus: &Corpus,
        observer: &dyn RunObserver,
    ) -> Result<Vec<ProviderStats>> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = self.options.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| EvalError::Config(format!("failed to build thread pool: {e}")))?;

        // Collecting into Vec keeps registration order
        pool.install(|| {
            providers
                .par_iter()
                .map(|provider| self.evaluate_provider(*provider, corpus, observer))
                .collect()
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_parallel(
        &self,
        providers: &[&dyn SegmentationProvider],
        corpus: &Corpus,
        observer: &dyn RunObserver,
    ) -> Result<Vec<ProviderStats>> {
        log::warn!("Built without the `parallel` feature; evaluating providers sequentially");
        providers
            .iter()
            .map(|provider| self.evaluate_provider(*provider, corpus, observer))
            .collect()
    }

    /// Evaluate a single provider
    pub fn evaluate_provider(
        &self,
        provider: &dyn SegmentationProvider,
        corpus: &Corpus,
        observer: &dyn RunObserver,
    ) -> Result<ProviderStats> {
        let id = provider.id();
        let mut stats = ProviderStats::new(id, provider.name());

        observer.provider_started(id, provider.name(), corpus.len());
        self.warm_up(provider, corpus)?;

        for (index, record) in corpus.iter().enumerate() {
            let start = Instant::now();
            let outcome = provider.split_sentences(record.text(), &record.lang_code);
            let elapsed = start.elapsed();

            match outcome {
                Ok(actual) => {
                    let score = self.scorer.score(record.expected(), &actual);
                    log::debug!(
                        "{id}: record {index} ({}) scored {score:.4} in {:.6}s",
                        record.lang_code,
                        elapsed.as_secs_f64()
                    );
                    stats.record_success(score, elapsed);
                    observer.trial_finished(id, index, Some(score));
                }
                Err(e) => {
                    log::warn!("{id}: record {index} failed: {e}");
                    if self.options.fail_fast {
                        return Err(EvalError::Trial {
                            provider: id.to_string(),
                            record: index,
                            source: Box::new(e),
                        });
                    }
                    stats.record_failure(TrialFailure {
                        record_index: index,
                        lang_code: record.lang_code.clone(),
                        message: e.to_string(),
                    });
                    observer.trial_finished(id, index, None);
                }
            }
        }

        match stats.mean_accuracy() {
            Some(accuracy) => log::info!(
                "{id}: accuracy {accuracy:.4}, {} ok, {} failed",
                stats.successful_trials(),
                stats.failed_trials()
            ),
            None => log::info!("{id}: no successful trials"),
        }

        observer.provider_finished(&stats);
        Ok(stats)
    }

    fn warm_up(&self, provider: &dyn SegmentationProvider, corpus: &Corpus) -> Result<()> {
        let lang_code = corpus
            .iter()
            .next()
            .map(|record| record.lang_code.as_str())
            .unwrap_or("en");

        for run in 0..self.options.warmup_runs {
            if let Err(e) = provider.warm_up(lang_code) {
                if self.options.fail_fast {
                    return Err(e);
                }
                log::warn!("{}: warm-up run {} failed: {e}", provider.id(), run + 1);
                break;
            }
        }
        Ok(())
    }
}

impl Default for ExperimentRunner {
    fn default() -> Self {
        Self::new(RunnerOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo;

    impl SegmentationProvider for Echo {
        fn id(&self) -> &str {
            "echo"
        }

        fn split_sentences(&self, text: &str, _lang_code: &str) -> Result<Vec<String>> {
            Ok(vec![text.to_string()])
        }
    }

    struct Counting {
        warmups: AtomicUsize,
    }

    impl SegmentationProvider for Counting {
        fn id(&self) -> &str {
            "counting"
        }

        fn split_sentences(&self, _text: &str, _lang_code: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn warm_up(&self, _lang_code: &str) -> Result<()> {
            self.warmups.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn corpus() -> Corpus {
        Corpus::new(vec![
            CorpusRecord::new("en", "One sentence.", vec!["One sentence.".to_string()]),
            CorpusRecord::new(
                "en",
                "Hello world. Goodbye.",
                vec!["Hello world.".to_string(), "Goodbye.".to_string()],
            ),
        ])
    }

    #[test]
    fn test_default_options() {
        let options = RunnerOptions::default();
        assert_eq!(options.warmup_runs, DEFAULT_WARMUP_RUNS);
        assert!(!options.fail_fast);
        assert!(!options.parallel);
        assert!(options.autojunk);
    }

    #[test]
    fn test_evaluate_provider_scores_each_record() {
        let runner = ExperimentRunner::default();
        let stats = runner
            .evaluate_provider(&Echo, &corpus(), &SilentObserver)
            .unwrap();

        assert_eq!(stats.successful_trials(), 2);
        let expected_mean = (1.0 + 24.0 / 33.0) / 2.0;
        assert!((stats.mean_accuracy().unwrap() - expected_mean).abs() < 1e-12);
    }

    #[test]
    fn test_warmup_runs_are_honored() {
        let provider = Counting {
            warmups: AtomicUsize::new(0),
        };
        let runner = ExperimentRunner::new(RunnerOptions {
            warmup_runs: 3,
            ..RunnerOptions::default()
        });

        let stats = runner
            .evaluate_provider(&provider, &corpus(), &SilentObserver)
            .unwrap();

        assert_eq!(provider.warmups.load(Ordering::SeqCst), 3);
        // Empty output scores zero but still counts as a trial
        assert_eq!(stats.successful_trials(), 2);
        assert_eq!(stats.mean_accuracy(), Some(0.0));
    }

    #[test]
    fn test_empty_corpus() {
        let runner = ExperimentRunner::default();
        let stats = runner
            .evaluate_provider(&Echo, &Corpus::default(), &SilentObserver)
            .unwrap();
        assert_eq!(stats.successful_trials(), 0);
        assert_eq!(stats.mean_accuracy(), None);
    }
}
