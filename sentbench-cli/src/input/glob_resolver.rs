//! Corpus file resolution using glob

use crate::error::CliError;
use anyhow::{Context, Result};
use glob::glob;
use sentbench_eval::Corpus;
use std::path::PathBuf;

/// Resolve file patterns to actual file paths
///
/// Every pattern must match at least one file. The result is sorted and
/// free of duplicates.
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let paths = glob(pattern).map_err(|_| CliError::InvalidPattern(pattern.clone()))?;

        let before = files.len();
        for path_result in paths {
            let path =
                path_result.with_context(|| format!("Error resolving pattern: {pattern}"))?;

            if path.is_file() {
                files.push(path);
            }
        }

        if files.len() == before {
            return Err(CliError::NoMatchingFiles(pattern.clone()).into());
        }
    }

    files.sort();
    files.dedup();

    Ok(files)
}

/// Load and concatenate every corpus file matched by `patterns`
pub fn load_corpus(patterns: &[String]) -> Result<Corpus> {
    let mut corpus = Corpus::default();

    for path in resolve_patterns(patterns)? {
        let part = Corpus::from_path(&path)
            .with_context(|| format!("Failed to load corpus: {}", path.display()))?;
        log::info!("Loaded {} record(s) from {}", part.len(), path.display());
        corpus.extend(part);
    }

    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const RECORD: &str =
        r#"{"lang_code": "en", "q": "One. Two.", "split_sentences": ["One.", "Two."]}"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_literal_and_glob_patterns() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.jsonl", RECORD);
        write(&dir, "b.jsonl", RECORD);
        write(&dir, "notes.txt", "ignored");

        let pattern = dir.path().join("*.jsonl").to_string_lossy().into_owned();
        let files = resolve_patterns(&[pattern, a]).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.jsonl"));
        assert!(files[1].ends_with("b.jsonl"));
    }

    #[test]
    fn test_unmatched_pattern_is_named() {
        let dir = TempDir::new().unwrap();
        let pattern = dir.path().join("*.jsonl").to_string_lossy().into_owned();

        let err = resolve_patterns(&[pattern.clone()]).unwrap_err();
        assert_eq!(err.to_string(), format!("No files found matching: {pattern}"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = resolve_patterns(&["[invalid".to_string()]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_load_corpus_concatenates() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.jsonl", RECORD);
        write(&dir, "b.jsonl", &format!("{RECORD}\n{RECORD}\n"));

        let pattern = dir.path().join("*.jsonl").to_string_lossy().into_owned();
        let corpus = load_corpus(&[pattern]).unwrap();
        assert_eq!(corpus.len(), 3);
    }

    #[test]
    fn test_load_corpus_reports_file() {
        let dir = TempDir::new().unwrap();
        let bad = write(&dir, "bad.jsonl", "{not json}");

        let err = load_corpus(&[bad]).unwrap_err();
        assert!(err.to_string().contains("Failed to load corpus"));
        assert!(format!("{err:#}").contains("line 1"));
    }
}
