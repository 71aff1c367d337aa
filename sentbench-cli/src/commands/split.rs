//! Split command implementation

use super::init_logging;
use crate::error::CliError;
use crate::input::FileReader;
use crate::output::{JsonFormatter, MarkdownFormatter, OutputFormatter, Segmentation, TextFormatter};
use anyhow::{Context, Result};
use clap::Args;
use sentbench_eval::constants::SAMPLE_TEXT;
use sentbench_eval::{EvalConfig, ProviderRegistry, SegmentationProvider};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the split command
#[derive(Debug, Args)]
pub struct SplitArgs {
    /// Text to split (default: a built-in sample paragraph)
    #[arg(value_name = "TEXT", conflicts_with = "input")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Provider ids to run (default: from config, else native providers)
    #[arg(short, long, value_name = "ID")]
    pub provider: Vec<String>,

    /// Language code passed to providers
    #[arg(short, long, value_name = "CODE", default_value = "en")]
    pub lang: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: SplitFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SplitFormat {
    /// Provider header followed by one sentence per line
    Text,
    /// JSON array with one entry per provider
    Json,
    /// Markdown section per provider
    Markdown,
}

impl SplitArgs {
    /// Execute the split command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        let text = self.read_text()?;
        let config = match &self.config {
            Some(path) => EvalConfig::from_path(path)
                .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
            None => EvalConfig::default(),
        };

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

        let writer: Box<dyn Write + Send + Sync> = match &self.output {
            Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
                format!("Failed to create output file: {}", path.display())
            })?)),
            None => Box::new(io::stdout()),
        };
        let mut formatter: Box<dyn OutputFormatter> = match self.format {
            SplitFormat::Text => Box::new(TextFormatter::new(writer)),
            SplitFormat::Json => Box::new(JsonFormatter::new(writer)),
            SplitFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        };

        for provider in registry.iter() {
            let segmentation = self.split_with(provider, &text);
            formatter.format_segmentation(&segmentation)?;
        }
        formatter.finish()?;

        Ok(())
    }

    fn read_text(&self) -> Result<String> {
        match (&self.text, &self.input) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => FileReader::read_text(path),
            (None, None) => Ok(SAMPLE_TEXT.to_string()),
        }
    }

    /// Run one provider, turning a failure into an error entry
    fn split_with(&self, provider: &dyn SegmentationProvider, text: &str) -> Segmentation {
        log::info!("Splitting with {}", provider.name());

        let start = Instant::now();
        let outcome = provider.split_sentences(text, &self.lang);
        let runtime_secs = start.elapsed().as_secs_f64();

        let (sentences, error) = match outcome {
            Ok(sentences) => (sentences, None),
            Err(e) => {
                log::warn!("{}: {e}", provider.id());
                (Vec::new(), Some(e.to_string()))
            }
        };

        Segmentation {
            id: provider.id().to_string(),
            name: provider.name().to_string(),
            sentences,
            runtime_secs,
            error,
        }
    }
}
