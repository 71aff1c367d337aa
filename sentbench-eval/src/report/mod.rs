//! Results reports
//!
//! A [`Report`] is a flat view of a [`ResultsTable`], one row per provider in
//! registration order. Writers render it as CSV, JSON or Markdown.

pub mod csv;
pub mod json;
pub mod markdown;

pub use self::csv::CsvWriter;
pub use self::json::JsonWriter;
pub use self::markdown::MarkdownWriter;

use crate::error::{EvalError, Result};
use crate::stats::ResultsTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Column titles shared by tabular formats
pub const MODEL_COLUMN: &str = "Model";
/// Mean score column title
pub const ACCURACY_COLUMN: &str = "Average Accuracy";
/// Mean latency column title
pub const RUNTIME_COLUMN: &str = "Average Runtime (seconds)";

/// One provider's aggregate results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Provider id
    pub id: String,
    /// Display name
    pub model: String,
    /// Mean score over successful trials
    pub average_accuracy: Option<f64>,
    /// Mean wall-clock seconds over successful trials
    pub average_runtime_secs: Option<f64>,
    /// Successful trials
    pub trials: usize,
    /// Failed trials
    pub failures: usize,
}

/// Aggregate results of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Rows in registration order
    pub rows: Vec<ReportRow>,
}

impl From<&ResultsTable> for Report {
    fn from(table: &ResultsTable) -> Self {
        let rows = table
            .iter()
            .map(|stats| ReportRow {
                id: stats.id.clone(),
                model: stats.name.clone(),
                average_accuracy: stats.mean_accuracy(),
                average_runtime_secs: stats.mean_runtime_secs(),
                trials: stats.successful_trials(),
                failures: stats.failed_trials(),
            })
            .collect();
        Self { rows }
    }
}

/// Renders a report to a byte sink
pub trait ReportWriter {
    /// Write the whole report
    fn write_report(&self, report: &Report, writer: &mut dyn Write) -> Result<()>;
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Comma separated values
    #[default]
    Csv,
    /// Pretty-printed JSON array
    Json,
    /// Markdown table
    Markdown,
}

impl ReportFormat {
    /// All formats
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Csv, ReportFormat::Json, ReportFormat::Markdown];

    /// Stable name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "markdown",
        }
    }

    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "md",
        }
    }

    /// Writer for this format
    pub fn writer(&self) -> Box<dyn ReportWriter> {
        match self {
            ReportFormat::Csv => Box::new(CsvWriter),
            ReportFormat::Json => Box::new(JsonWriter),
            ReportFormat::Markdown => Box::new(MarkdownWriter),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            other => Err(EvalError::Config(format!(
                "unknown report format '{other}' (expected csv, json or markdown)"
            ))),
        }
    }
}

/// Render `table` in `format`
pub fn write_report(format: ReportFormat, table: &ResultsTable, writer: &mut dyn Write) -> Result<()> {
    format.writer().write_report(&Report::from(table), writer)
}
