//! Evaluation configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! [evaluation]
//! normalization = "character_weighted"
//! warmup_runs = 1
//! providers = ["punctuation", "my-splitter"]
//!
//! [output]
//! format = "csv"
//!
//! [[providers]]
//! kind = "command"
//! id = "my-splitter"
//! program = "./split.sh"
//! ```
//!
//! Environment variables override file values, and command-line flags
//! override both.

use crate::constants::{corpus_limit_override, warmup_runs_override, DEFAULT_WARMUP_RUNS};
use crate::error::{EvalError, Result};
use crate::provider::{ProviderSpec, NATIVE_PROVIDER_IDS};
use crate::report::ReportFormat;
use crate::runner::RunnerOptions;
use sentbench_core::{Normalization, UnknownNormalization};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EvalConfig {
    /// How trials are run and scored
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Where and how results are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Additional or overriding provider definitions
    #[serde(default)]
    pub providers: Vec<ProviderSpec>,
}

/// Normalization as written in a configuration file
///
/// Parsed once when the file is read, so an unknown name is a TOML error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct NormalizationSetting(pub Normalization);

impl TryFrom<String> for NormalizationSetting {
    type Error = UnknownNormalization;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse().map(Self)
    }
}

impl From<NormalizationSetting> for String {
    fn from(setting: NormalizationSetting) -> Self {
        setting.0.to_string()
    }
}

impl From<Normalization> for NormalizationSetting {
    fn from(normalization: Normalization) -> Self {
        Self(normalization)
    }
}

impl fmt::Display for NormalizationSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// `[evaluation]` table
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Score normalization
    pub normalization: NormalizationSetting,
    /// Popular-character heuristic in the similarity ratio
    pub autojunk: bool,
    /// Untimed warm-up calls per provider
    pub warmup_runs: usize,
    /// Abort on the first failed trial
    pub fail_fast: bool,
    /// Evaluate providers concurrently
    pub parallel: bool,
    /// Worker threads for parallel runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    /// Use only the first N corpus records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Provider ids to run when none are given on the command line
    pub providers: Vec<String>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            normalization: NormalizationSetting::default(),
            autojunk: true,
            warmup_runs: DEFAULT_WARMUP_RUNS,
            fail_fast: false,
            parallel: false,
            threads: None,
            limit: None,
            providers: Vec::new(),
        }
    }
}

/// `[output]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format
    pub format: ReportFormat,
    /// Report file; stdout when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl EvalConfig {
    /// Load a configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| EvalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a configuration string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SENTBENCH_WARMUP_RUNS` and `SENTBENCH_CORPUS_LIMIT`
    pub fn apply_env_overrides(&mut self) {
        if let Some(runs) = warmup_runs_override() {
            log::debug!("Warm-up runs overridden from environment: {runs}");
            self.evaluation.warmup_runs = runs;
        }
        if let Some(limit) = corpus_limit_override() {
            log::debug!("Corpus limit overridden from environment: {limit}");
            self.evaluation.limit = Some(limit);
        }
    }

    /// Check ids and numeric ranges
    pub fn validate(&self) -> Result<()> {
        if self.evaluation.threads == Some(0) {
            return Err(EvalError::Config("threads must be at least 1".to_string()));
        }

        let mut ids = HashSet::new();
        for spec in &self.providers {
            if spec.id().trim().is_empty() {
                return Err(EvalError::Config(format!(
                    "{} provider has an empty id",
                    spec.kind()
                )));
            }
            if !ids.insert(spec.id()) {
                return Err(EvalError::DuplicateProvider(spec.id().to_string()));
            }
        }

        Ok(())
    }

    /// Configured normalization
    pub fn normalization(&self) -> Normalization {
        self.evaluation.normalization.0
    }

    /// Provider ids to run when none are requested explicitly
    ///
    /// Falls back to every configured provider, then to the native built-ins.
    pub fn default_provider_ids(&self) -> Vec<String> {
        if !self.evaluation.providers.is_empty() {
            self.evaluation.providers.clone()
        } else if !self.providers.is_empty() {
            self.providers.iter().map(|s| s.id().to_string()).collect()
        } else {
            NATIVE_PROVIDER_IDS.iter().map(|id| id.to_string()).collect()
        }
    }

    /// Runner options described by this configuration
    pub fn runner_options(&self) -> RunnerOptions {
        RunnerOptions {
            warmup_runs: self.evaluation.warmup_runs,
            fail_fast: self.evaluation.fail_fast,
            parallel: self.evaluation.parallel,
            threads: self.evaluation.threads,
            normalization: self.normalization(),
            autojunk: self.evaluation.autojunk,
        }
    }
}
