//! Output formatting for `sentbench split`

use anyhow::Result;
use serde::Serialize;

/// One provider's segmentation of the input text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segmentation {
    /// Provider id
    pub id: String,
    /// Display name
    pub name: String,
    /// Sentences, empty when the provider failed
    pub sentences: Vec<String>,
    /// Wall-clock seconds for the call
    pub runtime_secs: f64,
    /// Error message if the provider failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format one provider's result
    fn format_segmentation(&mut self, segmentation: &Segmentation) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

#[cfg(test)]
pub(crate) fn sample() -> Vec<Segmentation> {
    vec![
        Segmentation {
            id: "punctuation".to_string(),
            name: "Rule-based punctuation".to_string(),
            sentences: vec!["Hello world.".to_string(), "Goodbye.".to_string()],
            runtime_secs: 0.25,
            error: None,
        },
        Segmentation {
            id: "spacy".to_string(),
            name: "Spacy en_core_web_sm".to_string(),
            sentences: Vec::new(),
            runtime_secs: 0.5,
            error: Some("spacy is not installed".to_string()),
        },
    ]
}

#[cfg(test)]
pub(crate) fn render(formatter: &mut dyn OutputFormatter) {
    for segmentation in sample() {
        formatter.format_segmentation(&segmentation).unwrap();
    }
    formatter.finish().unwrap();
}
