//! Validate command implementation

use crate::error::CliError;
use crate::input::resolve_patterns;
use anyhow::Result;
use clap::Args;
use sentbench_eval::{Corpus, EvalConfig, ProviderRegistry};
use std::path::{Path, PathBuf};

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Corpus files or patterns to check
    #[arg(short, long, value_name = "FILE/PATTERN", required_unless_present = "config")]
    pub corpus: Vec<String>,

    /// Configuration file to check
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        let mut invalid = 0;

        if let Some(path) = &self.config {
            if !Self::validate_config(path) {
                invalid += 1;
            }
        }

        if !self.corpus.is_empty() {
            for path in resolve_patterns(&self.corpus)? {
                if !Self::validate_corpus(&path) {
                    invalid += 1;
                }
            }
        }

        if invalid > 0 {
            return Err(CliError::ValidationFailed(invalid).into());
        }
        Ok(())
    }

    fn validate_corpus(path: &Path) -> bool {
        println!("Validating corpus: {}", path.display());

        match Corpus::from_path(path) {
            Ok(corpus) if corpus.is_empty() => {
                println!("✗ Corpus has no records");
                false
            }
            Ok(corpus) => {
                println!("✓ Corpus is valid!");
                println!("  {}", corpus.summary());
                true
            }
            Err(e) => {
                println!("✗ Corpus is invalid!");
                println!("  Error: {e}");
                false
            }
        }
    }

    fn validate_config(path: &Path) -> bool {
        println!("Validating configuration: {}", path.display());

        let config = match EvalConfig::from_path(path) {
            Ok(config) => config,
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e}");
                return false;
            }
        };

        let ids = config.default_provider_ids();
        match ProviderRegistry::select(&ids, &config.providers) {
            Ok(registry) => {
                println!("✓ Configuration is valid!");
                println!("  Normalization: {}", config.evaluation.normalization);
                println!("  Report format: {}", config.output.format);
                println!("  Providers: {}", registry.ids().join(", "));
                true
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e}");
                false
            }
        }
    }
}
