//! Markdown output formatter

use super::{OutputFormatter, Segmentation};
use anyhow::Result;
use std::io::Write;

/// Markdown formatter - a section per provider with a numbered sentence list
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    provider_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            provider_count: 0,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_segmentation(&mut self, segmentation: &Segmentation) -> Result<()> {
        self.provider_count += 1;
        writeln!(self.writer, "## {}", segmentation.name)?;
        writeln!(self.writer)?;

        match &segmentation.error {
            Some(error) => writeln!(self.writer, "> error: {error}")?,
            None => {
                for (i, sentence) in segmentation.sentences.iter().enumerate() {
                    writeln!(self.writer, "{}. {}", i + 1, sentence.trim())?;
                }
            }
        }

        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "*Runtime: {:.6} seconds*",
            segmentation.runtime_secs
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total providers: {}*", self.provider_count)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::render;

    #[test]
    fn test_markdown_sections() {
        let mut formatter = MarkdownFormatter::new(Vec::new());
        render(&mut formatter);
        let output = String::from_utf8(formatter.writer).unwrap();

        assert!(output.starts_with("## Rule-based punctuation\n\n1. Hello world.\n2. Goodbye.\n"));
        assert!(output.contains("> error: spacy is not installed"));
        assert!(output.contains("*Runtime: 0.250000 seconds*"));
        assert!(output.ends_with("---\n*Total providers: 2*\n"));
    }
}
