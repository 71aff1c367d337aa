//! Sentence segmentation benchmark runner
//!
//! Loads a labeled corpus, runs a set of segmentation providers over it,
//! scores every output with [`sentbench_core::Scorer`], and aggregates mean
//! accuracy and mean latency per provider.
//!
//! # Example
//!
//! ```
//! use sentbench_eval::{Corpus, ExperimentRunner, ProviderRegistry, RunnerOptions};
//!
//! let corpus = Corpus::parse_str(
//!     r#"{"lang_code": "en", "q": "Hello world. Goodbye.", "split_sentences": ["Hello world.", "Goodbye."]}"#,
//! )
//! .unwrap();
//! let registry = ProviderRegistry::select(&["punctuation"], &[]).unwrap();
//!
//! let results = ExperimentRunner::new(RunnerOptions::default())
//!     .run(&registry, &corpus)
//!     .unwrap();
//! assert_eq!(results.get("punctuation").unwrap().mean_accuracy(), Some(1.0));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod corpus;
pub mod error;
pub mod provider;
pub mod report;
pub mod runner;
pub mod stats;

pub use config::{EvalConfig, EvaluationConfig, NormalizationSetting, OutputConfig};
pub use corpus::{Corpus, CorpusRecord, CorpusSummary};
pub use error::{EvalError, Result};
pub use provider::{builtin_specs, ProviderRegistry, ProviderSpec, SegmentationProvider};
pub use report::{write_report, Report, ReportFormat, ReportRow, ReportWriter};
pub use runner::{ExperimentRunner, RunObserver, RunnerOptions, SilentObserver};
pub use stats::{ProviderStats, ResultsTable, TrialFailure};
