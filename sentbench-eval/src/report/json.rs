//! JSON report writer

use super::{Report, ReportWriter};
use crate::error::Result;
use std::io::Write;

/// Writes the report rows as a pretty-printed JSON array
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl ReportWriter for JsonWriter {
    fn write_report(&self, report: &Report, writer: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, &report.rows)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{render, sample_table};
    use crate::report::{ReportFormat, ReportRow};

    #[test]
    fn test_rows_deserialize_back() {
        let output = render(ReportFormat::Json, &sample_table());
        let rows: Vec<ReportRow> = serde_json::from_str(&output).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].model, "Rule-based punctuation");
        assert_eq!(rows[1].average_accuracy, None);
        assert_eq!(rows[1].failures, 1);
    }

    #[test]
    fn test_missing_mean_is_null() {
        let output = render(ReportFormat::Json, &sample_table());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value[1]["average_accuracy"].is_null());
    }
}
