//! Plain text output formatter

use super::{OutputFormatter, Segmentation};
use anyhow::Result;
use std::io::{self, Write};

/// Plain text formatter - a header per provider, then one sentence per line
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_segmentation(&mut self, segmentation: &Segmentation) -> Result<()> {
        writeln!(
            self.writer,
            "{} ({:.6}s)",
            segmentation.name, segmentation.runtime_secs
        )?;

        match &segmentation.error {
            Some(error) => writeln!(self.writer, "  error: {error}")?,
            None => {
                for sentence in &segmentation.sentences {
                    writeln!(self.writer, "  {}", sentence.trim())?;
                }
            }
        }

        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::render;

    #[test]
    fn test_text_layout() {
        let mut formatter = TextFormatter::new(Vec::new());
        render(&mut formatter);
        let output = String::from_utf8(formatter.writer).unwrap();

        assert_eq!(
            output,
            "Rule-based punctuation (0.250000s)\n  Hello world.\n  Goodbye.\n\n\
             Spacy en_core_web_sm (0.500000s)\n  error: spacy is not installed\n\n"
        );
    }
}
