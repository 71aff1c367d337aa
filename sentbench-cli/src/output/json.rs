//! JSON output formatter

use super::{OutputFormatter, Segmentation};
use anyhow::Result;
use std::io::Write;

/// JSON formatter - outputs all segmentations as one JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    segmentations: Vec<Segmentation>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            segmentations: Vec::new(),
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_segmentation(&mut self, segmentation: &Segmentation) -> Result<()> {
        self.segmentations.push(segmentation.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.segmentations)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
