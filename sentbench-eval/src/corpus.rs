//! Labeled corpus loading
//!
//! A corpus is a JSON Lines file. Each line holds one record:
//!
//! ```text
//! {"lang_code": "en", "q": "Hello world. Goodbye.", "split_sentences": ["Hello world.", "Goodbye."]}
//! ```
//!
//! `q` is the raw text given to a provider and `split_sentences` is the
//! ground-truth segmentation of that text.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One labeled text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRecord {
    /// Language code handed to providers
    pub lang_code: String,
    /// Raw input text
    pub q: String,
    /// Ground-truth segmentation
    pub split_sentences: Vec<String>,
}

impl CorpusRecord {
    /// Create a new record
    pub fn new(
        lang_code: impl Into<String>,
        text: impl Into<String>,
        split_sentences: Vec<String>,
    ) -> Self {
        Self {
            lang_code: lang_code.into(),
            q: text.into(),
            split_sentences,
        }
    }

    /// Raw input text
    pub fn text(&self) -> &str {
        &self.q
    }

    /// Ground-truth segmentation
    pub fn expected(&self) -> &[String] {
        &self.split_sentences
    }
}

/// Ordered collection of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    records: Vec<CorpusRecord>,
}

impl Corpus {
    /// Build a corpus from records
    pub fn new(records: Vec<CorpusRecord>) -> Self {
        Self { records }
    }

    /// Parse JSON Lines from a reader
    ///
    /// Blank lines are skipped. The first malformed line aborts parsing with
    /// its 1-based line number.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut records = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: CorpusRecord = serde_json::from_str(&line)
                .map_err(|source| EvalError::CorpusParse {
                    line: idx + 1,
                    source,
                })?;
            records.push(record);
        }

        log::debug!("Parsed {} corpus records", records.len());
        Ok(Self { records })
    }

    /// Parse JSON Lines from a string
    pub fn parse_str(content: &str) -> Result<Self> {
        Self::from_reader(content.as_bytes())
    }

    /// Load a JSON Lines file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| EvalError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let corpus = Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            EvalError::Stream(source) => EvalError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        log::info!(
            "Loaded {} records from {}",
            corpus.len(),
            path.display()
        );
        Ok(corpus)
    }

    /// Append all records of another corpus
    pub fn extend(&mut self, other: Corpus) {
        self.records.extend(other.records);
    }

    /// Keep at most `limit` records
    pub fn truncate(&mut self, limit: usize) {
        self.records.truncate(limit);
    }

    /// All records in order
    pub fn records(&self) -> &[CorpusRecord] {
        &self.records
    }

    /// Iterate over records in order
    pub fn iter(&self) -> std::slice::Iter<'_, CorpusRecord> {
        self.records.iter()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Summary statistics
    pub fn summary(&self) -> CorpusSummary {
        let mut languages = BTreeMap::new();
        let mut sentences = 0;
        let mut characters = 0;

        for record in &self.records {
            *languages.entry(record.lang_code.clone()).or_insert(0) += 1;
            sentences += record.split_sentences.len();
            characters += record.q.chars().count();
        }

        CorpusSummary {
            records: self.records.len(),
            sentences,
            characters,
            languages,
        }
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a CorpusRecord;
    type IntoIter = std::slice::Iter<'a, CorpusRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<CorpusRecord> for Corpus {
    fn from_iter<I: IntoIterator<Item = CorpusRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Counts describing a corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusSummary {
    /// Number of records
    pub records: usize,
    /// Total ground-truth sentences
    pub sentences: usize,
    /// Total characters of raw text
    pub characters: usize,
    /// Records per language code
    pub languages: BTreeMap<String, usize>,
}

impl fmt::Display for CorpusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let languages: Vec<String> = self
            .languages
            .iter()
            .map(|(code, count)| format!("{code} ({count})"))
            .collect();
        write!(
            f,
            "{} records, {} sentences, {} chars, languages: {}",
            self.records,
            self.sentences,
            self.characters,
            if languages.is_empty() {
                "none".to_string()
            } else {
                languages.join(", ")
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{"lang_code": "en", "q": "Hello world. Goodbye.", "split_sentences": ["Hello world.", "Goodbye."]}
{"lang_code": "de", "q": "Hallo Welt.", "split_sentences": ["Hallo Welt."]}
"#;

    #[test]
    fn test_parse_records() {
        let corpus = Corpus::parse_str(SAMPLE).unwrap();
        assert_eq!(corpus.len(), 2);

        let first = &corpus.records()[0];
        assert_eq!(first.lang_code, "en");
        assert_eq!(first.text(), "Hello world. Goodbye.");
        assert_eq!(first.expected(), &["Hello world.", "Goodbye."]);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let content = format!("\n{SAMPLE}\n   \n");
        assert_eq!(Corpus::parse_str(&content).unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let content = format!("{SAMPLE}{{\"lang_code\": \"en\", \"q\": 5}}\n");
        match Corpus::parse_str(&content) {
            Err(EvalError::CorpusParse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let result = Corpus::parse_str(r#"{"lang_code": "en", "q": "Hi."}"#);
        assert!(matches!(result, Err(EvalError::CorpusParse { line: 1, .. })));
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();

        let corpus = Corpus::from_path(file.path()).unwrap();
        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn test_from_missing_path() {
        let result = Corpus::from_path("/nonexistent/corpus.jsonl");
        match result {
            Err(EvalError::Io { path, .. }) => {
                assert_eq!(path, Path::new("/nonexistent/corpus.jsonl"))
            }
            other => panic!("expected I/O error, got {other:?}"),
        }
    }

    #[test]
    fn test_truncate_and_extend() {
        let mut corpus = Corpus::parse_str(SAMPLE).unwrap();
        corpus.extend(Corpus::parse_str(SAMPLE).unwrap());
        assert_eq!(corpus.len(), 4);

        corpus.truncate(3);
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.records()[2].lang_code, "en");
    }

    #[test]
    fn test_summary() {
        let summary = Corpus::parse_str(SAMPLE).unwrap().summary();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.sentences, 3);
        assert_eq!(summary.characters, 21 + 11);
        assert_eq!(summary.languages.get("en"), Some(&1));
        assert_eq!(
            summary.to_string(),
            "2 records, 3 sentences, 32 chars, languages: de (1), en (1)"
        );
    }

    #[test]
    fn test_record_roundtrip_field_names() {
        let record = CorpusRecord::new("en", "A. B.", vec!["A.".into(), "B.".into()]);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["lang_code"], "en");
        assert_eq!(json["q"], "A. B.");
        assert_eq!(json["split_sentences"][1], "B.");
    }
}
