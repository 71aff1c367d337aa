//! Rule-based punctuation splitter
//!
//! Splits after runs of sentence terminators followed by whitespace. A period
//! directly after a known abbreviation or a single-letter initial (other than
//! the pronoun "I") does not end a sentence. CJK full-width terminators end a
//! sentence without needing whitespace.

use super::SegmentationProvider;
use crate::error::{EvalError, Result};
use regex::Regex;
use std::collections::HashSet;

/// Abbreviations that do not end a sentence, lowercase and without the final period
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    // titles
    "dr", "mr", "mrs", "ms", "prof", "sr", "jr", "st",
    // academic
    "ph.d", "m.d", "b.a", "m.a",
    // business
    "inc", "corp", "ltd", "co",
    // common
    "etc", "vs", "e.g", "i.e", "cf", "approx", "fig",
    // geographic
    "u.s", "u.k", "ave", "blvd", "mt",
    // months
    "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
];

const TERMINATOR_PATTERN: &str = r#"[.!?]+["'”’)\]]*\s+|[。！？]+[」』）]*\s*"#;

/// Regex-driven sentence splitter with an abbreviation list
#[derive(Debug, Clone)]
pub struct PunctuationProvider {
    id: String,
    name: String,
    terminator: Regex,
    abbreviations: HashSet<String>,
}

impl PunctuationProvider {
    /// Create a splitter with the default abbreviation list
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let terminator = Regex::new(TERMINATOR_PATTERN)
            .map_err(|e| EvalError::Config(format!("invalid terminator pattern: {e}")))?;

        let id = id.into();
        Ok(Self {
            name: id.clone(),
            id,
            terminator,
            abbreviations: DEFAULT_ABBREVIATIONS.iter().map(|a| a.to_string()).collect(),
        })
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add abbreviations; a trailing period is optional
    pub fn with_abbreviations<I, S>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.abbreviations.extend(
            abbreviations
                .into_iter()
                .map(|a| a.as_ref().trim().trim_end_matches('.').to_lowercase())
                .filter(|a| !a.is_empty()),
        );
        self
    }

    /// Whether the word ending right before a period suppresses a boundary
    fn suppresses_boundary(&self, before: &str) -> bool {
        let word = before
            .rsplit(|c: char| c.is_whitespace() || matches!(c, '(' | '[' | '"' | '\'' | '“' | '‘'))
            .next()
            .unwrap_or("");

        let mut chars = word.chars();
        // "I" is the pronoun far more often than an initial
        let is_initial =
            matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase() && c != 'I');

        is_initial || self.abbreviations.contains(&word.to_lowercase())
    }

    /// Split `text` into trimmed, non-empty sentences
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for m in self.terminator.find_iter(text) {
            let terminator = m.as_str().trim_end();
            if terminator.starts_with('.')
                && !terminator.starts_with("..")
                && self.suppresses_boundary(&text[start..m.start()])
            {
                continue;
            }

            push_trimmed(&mut sentences, &text[start..m.end()]);
            start = m.end();
        }

        push_trimmed(&mut sentences, &text[start..]);
        sentences
    }
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}

impl SegmentationProvider for PunctuationProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn split_sentences(&self, text: &str, _lang_code: &str) -> Result<Vec<String>> {
        Ok(self.split(text))
    }
}
