//! Unicode sentence boundaries (UAX #29)

use super::SegmentationProvider;
use crate::error::Result;
use unicode_segmentation::UnicodeSegmentation;

/// Splits on the default sentence boundaries of Unicode Standard Annex #29
#[derive(Debug, Clone)]
pub struct UnicodeProvider {
    id: String,
    name: String,
}

impl UnicodeProvider {
    /// Create a provider
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl SegmentationProvider for UnicodeProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn split_sentences(&self, text: &str, _lang_code: &str) -> Result<Vec<String>> {
        Ok(text
            .split_sentence_bounds()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }
}
