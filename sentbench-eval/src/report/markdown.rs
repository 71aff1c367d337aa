//! Markdown report writer

use super::{Report, ReportWriter, ACCURACY_COLUMN, MODEL_COLUMN, RUNTIME_COLUMN};
use crate::error::Result;
use std::io::Write;

/// Writes the report as a Markdown table
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownWriter;

impl ReportWriter for MarkdownWriter {
    fn write_report(&self, report: &Report, writer: &mut dyn Write) -> Result<()> {
        writeln!(
            writer,
            "| {MODEL_COLUMN} | {ACCURACY_COLUMN} | {RUNTIME_COLUMN} | Trials | Failures |"
        )?;
        writeln!(writer, "|---|---:|---:|---:|---:|")?;

        for row in &report.rows {
            let accuracy = row
                .average_accuracy
                .map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
            let runtime = row
                .average_runtime_secs
                .map_or_else(|| "-".to_string(), |v| format!("{v:.6}"));
            writeln!(
                writer,
                "| {} | {accuracy} | {runtime} | {} | {} |",
                row.model.replace('|', "\\|"),
                row.trials,
                row.failures
            )?;
        }

        writer.flush()?;
        Ok(())
    }
}
