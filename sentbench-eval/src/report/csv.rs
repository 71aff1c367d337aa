//! CSV report writer
//!
//! The header reads `Model, Average Accuracy, Average Runtime (seconds)`, so
//! every field after the first carries a leading space. A provider without
//! successful trials has empty numeric fields.

use super::{Report, ReportWriter, ACCURACY_COLUMN, MODEL_COLUMN, RUNTIME_COLUMN};
use crate::error::Result;
use std::io::Write;

/// Writes the results table as CSV
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvWriter;

impl ReportWriter for CsvWriter {
    fn write_report(&self, report: &Report, writer: &mut dyn Write) -> Result<()> {
        let mut csv = csv::WriterBuilder::new()
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(writer);

        csv.write_record([
            MODEL_COLUMN.to_string(),
            spaced(ACCURACY_COLUMN),
            spaced(RUNTIME_COLUMN),
        ])?;

        for row in &report.rows {
            csv.write_record([
                row.model.clone(),
                number(row.average_accuracy),
                number(row.average_runtime_secs),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}

fn spaced(field: &str) -> String {
    format!(" {field}")
}

fn number(value: Option<f64>) -> String {
    match value {
        Some(value) => spaced(&value.to_string()),
        None => " ".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{render, sample_table};
    use crate::report::ReportFormat;
    use crate::stats::{ProviderStats, ResultsTable};
    use std::time::Duration;

    #[test]
    fn test_header_is_exact() {
        let output = render(ReportFormat::Csv, &sample_table());
        assert_eq!(
            output.lines().next().unwrap(),
            "Model, Average Accuracy, Average Runtime (seconds)"
        );
    }

    #[test]
    fn test_rows() {
        let output = render(ReportFormat::Csv, &sample_table());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Rule-based punctuation, 0.75, 0.5");
        assert_eq!(lines[2], "Spacy en_core_web_sm, , ");
    }

    #[test]
    fn test_quoting() {
        let mut stats = ProviderStats::new("quoted", "say \"hi\", then split");
        stats.record_success(1.0, Duration::from_millis(500));
        let table: ResultsTable = [stats].into_iter().collect();

        let output = render(ReportFormat::Csv, &table);
        assert_eq!(
            output.lines().nth(1).unwrap(),
            "\"say \"\"hi\"\", then split\", 1, 0.5"
        );
    }
}
