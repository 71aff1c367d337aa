//! File reading utilities

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// File reader for text inputs and segmentation files
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(content)
    }

    /// Read a segmentation: a JSON array of strings, or one sentence per line
    ///
    /// Blank lines are skipped in the line format.
    pub fn read_segmentation(path: &Path) -> Result<Vec<String>> {
        let content = Self::read_text(path)?;

        if content.trim_start().starts_with('[') {
            return serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON segmentation: {}", path.display()));
        }

        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }
}
