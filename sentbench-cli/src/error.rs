//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// A corpus pattern matched no file
    NoMatchingFiles(String),
    /// Invalid file pattern
    InvalidPattern(String),
    /// The loaded corpus has no records
    EmptyCorpus,
    /// No provider was selected
    NoProviders,
    /// One or more inputs failed validation
    ValidationFailed(usize),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NoMatchingFiles(pattern) => write!(f, "No files found matching: {pattern}"),
            CliError::InvalidPattern(pattern) => write!(f, "Invalid file pattern: {pattern}"),
            CliError::EmptyCorpus => write!(f, "Corpus contains no records"),
            CliError::NoProviders => write!(f, "No providers selected"),
            CliError::ValidationFailed(count) => write!(f, "Validation failed for {count} input(s)"),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
