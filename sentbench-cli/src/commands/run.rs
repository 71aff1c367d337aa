//! Run command implementation

use super::init_logging;
use crate::error::CliError;
use crate::input::load_corpus;
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use sentbench_core::Normalization;
use sentbench_eval::{
    write_report, EvalConfig, ExperimentRunner, ProviderRegistry, ReportFormat, ResultsTable,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Arguments for the run command
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Corpus files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub corpus: Vec<String>,

    /// Provider ids to evaluate (default: from config, else native providers)
    #[arg(short, long, value_name = "ID")]
    pub provider: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format: csv, json or markdown
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use only the first N corpus records
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Untimed warm-up calls per provider
    #[arg(long, value_name = "N")]
    pub warmup_runs: Option<usize>,

    /// Stop at the first failed trial
    #[arg(long)]
    pub fail_fast: bool,

    /// Evaluate providers concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Worker threads for --parallel (default: one per provider, up to CPU count)
    #[arg(short = 't', long, value_name = "COUNT")]
    pub threads: Option<usize>,

    /// Score normalization: character_weighted or sentence_count
    #[arg(long, value_name = "NAME")]
    pub normalization: Option<Normalization>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl RunArgs {
    /// Execute the run command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        log::info!("Starting benchmark run");
        log::debug!("Arguments: {:?}", self);

        let config = self.load_config()?;

        let mut corpus = load_corpus(&self.corpus)?;
        if let Some(limit) = config.evaluation.limit {
            corpus.truncate(limit);
        }
        if corpus.is_empty() {
            return Err(CliError::EmptyCorpus.into());
        }
        log::info!("Corpus: {}", corpus.summary());

        let ids = if self.provider.is_empty() {
            config.default_provider_ids()
        } else {
            self.provider.clone()
        };
        if ids.is_empty() {
            return Err(CliError::NoProviders.into());
        }

        let registry = ProviderRegistry::select(&ids, &config.providers)
            .context("Failed to set up providers")?;
        for provider in registry.iter() {
            if !provider.is_available() {
                log::warn!(
                    "Provider '{}' does not appear to be available; its trials will fail",
                    provider.id()
                );
            }
        }

        let mut options = config.runner_options();
        if options.parallel && options.threads.is_none() {
            options.threads = Some(registry.len().min(num_cpus::get()).max(1));
        }
        log::debug!("Runner options: {options:?}");

        let mut reporter = ProgressReporter::new(self.quiet);
        reporter.init_trials((registry.len() * corpus.len()) as u64);

        let results = ExperimentRunner::new(options).run_with_observer(&registry, &corpus, &reporter);
        reporter.finish();
        let results = results?;

        let output = self.output.clone().or(config.output.path.clone());
        self.write_results(&results, config.output.format, output.as_deref())?;

        let failures = results.total_failures();
        if failures > 0 {
            log::warn!("{failures} trial(s) failed; see the log for details");
        }

        Ok(())
    }

    /// Configuration file, environment, then flags
    fn load_config(&self) -> Result<EvalConfig> {
        let mut config = match &self.config {
            Some(path) => EvalConfig::from_path(path)
                .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
            None => EvalConfig::default(),
        };
        config.apply_env_overrides();

        let evaluation = &mut config.evaluation;
        if let Some(limit) = self.limit {
            evaluation.limit = Some(limit);
        }
        if let Some(runs) = self.warmup_runs {
            evaluation.warmup_runs = runs;
        }
        if let Some(normalization) = self.normalization {
            evaluation.normalization = normalization.into();
        }
        if let Some(threads) = self.threads {
            anyhow::ensure!(threads > 0, "--threads must be at least 1");
            evaluation.threads = Some(threads);
        }
        evaluation.fail_fast |= self.fail_fast;
        evaluation.parallel |= self.parallel;

        if let Some(format) = self.format {
            config.output.format = format;
        }

        Ok(config)
    }

    fn write_results(
        &self,
        results: &ResultsTable,
        format: ReportFormat,
        output: Option<&Path>,
    ) -> Result<()> {
        match output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                let mut writer = BufWriter::new(file);
                write_report(format, results, &mut writer)
                    .with_context(|| format!("Failed to write report: {}", path.display()))?;
                writer.flush()?;
                log::info!("Wrote {format} report to {}", path.display());
            }
            None => {
                let stdout = io::stdout();
                let mut writer = stdout.lock();
                write_report(format, results, &mut writer).context("Failed to write report")?;
            }
        }
        Ok(())
    }
}
