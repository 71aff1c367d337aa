//! Error types for evaluation runs

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading data, running providers or writing reports
#[derive(Error, Debug)]
pub enum EvalError {
    /// I/O error tied to a file
    #[error("I/O error for path '{}': {source}", .path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// I/O error on a stream or pipe
    #[error("I/O error: {0}")]
    Stream(#[from] io::Error),

    /// A corpus line is not a valid record
    #[error("failed to parse corpus line {line}: {source}")]
    CorpusParse {
        /// 1-based line number
        line: usize,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A provider could not segment a text
    #[error("provider '{provider}' failed: {message}")]
    Provider {
        /// Provider id
        provider: String,
        /// What went wrong
        message: String,
    },

    /// No provider is registered under this id
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    /// Two providers share an id
    #[error("duplicate provider id '{0}'")]
    DuplicateProvider(String),

    /// A single trial failed and the run was set to stop on failure
    #[error("trial failed for provider '{provider}' on record {record}: {source}")]
    Trial {
        /// Provider id
        provider: String,
        /// 0-based record index
        record: usize,
        /// Underlying provider error
        #[source]
        source: Box<EvalError>,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// TOML parsing error
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl EvalError {
    /// Shorthand for a provider failure
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

/// Result type for evaluation operations
pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let error = EvalError::Io {
            path: PathBuf::from("corpus.jsonl"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(
            error.to_string(),
            "I/O error for path 'corpus.jsonl': missing"
        );
    }

    #[test]
    fn test_corpus_parse_names_line() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = EvalError::CorpusParse { line: 7, source };
        assert!(error.to_string().starts_with("failed to parse corpus line 7:"));
    }

    #[test]
    fn test_trial_error_chains_source() {
        let error = EvalError::Trial {
            provider: "spacy".to_string(),
            record: 3,
            source: Box::new(EvalError::provider("spacy", "model not installed")),
        };

        let message = error.to_string();
        assert!(message.contains("'spacy'"));
        assert!(message.contains("record 3"));
        assert!(message.contains("model not installed"));

        let source = std::error::Error::source(&error).unwrap();
        assert_eq!(
            source.to_string(),
            "provider 'spacy' failed: model not installed"
        );
    }
}
