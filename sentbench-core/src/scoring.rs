//! Similarity scoring of a candidate segmentation against ground truth

use crate::alignment::{Aligner, Alignment};
use std::fmt;
use std::str::FromStr;

/// How the aligned ratios are folded into one score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Normalization {
    /// Each ratio is weighted by the char length of its actual sentence, and
    /// the sum is divided by the char total of the longer segmentation
    #[default]
    CharacterWeighted,
    /// Sum of ratios divided by the larger sentence count
    SentenceCount,
}

impl Normalization {
    /// All variants, in display order
    pub const ALL: [Normalization; 2] = [
        Normalization::CharacterWeighted,
        Normalization::SentenceCount,
    ];

    /// Stable identifier used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Normalization::CharacterWeighted => "character_weighted",
            Normalization::SentenceCount => "sentence_count",
        }
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized normalization name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNormalization(pub String);

impl fmt::Display for UnknownNormalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown normalization '{}' (expected character_weighted or sentence_count)",
            self.0
        )
    }
}

impl std::error::Error for UnknownNormalization {}

impl FromStr for Normalization {
    type Err = UnknownNormalization;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "character_weighted" | "chars" => Ok(Normalization::CharacterWeighted),
            "sentence_count" | "sentences" => Ok(Normalization::SentenceCount),
            _ => Err(UnknownNormalization(s.to_string())),
        }
    }
}

/// A score together with the alignment it was computed from
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Normalized score
    pub score: f64,
    /// Alignment of actual sentences to expected sentences
    pub alignment: Alignment,
    /// Denominator used for normalization
    pub denominator: f64,
}

/// Scores actual segmentations against expected ones
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    aligner: Aligner,
    normalization: Normalization,
}

impl Scorer {
    /// Scorer with default aligner and character-weighted normalization
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific normalization
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Use a specific aligner
    pub fn with_aligner(mut self, aligner: Aligner) -> Self {
        self.aligner = aligner;
        self
    }

    /// Configured normalization
    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Score `actual` against `expected`
    pub fn score<E, A>(&self, expected: &[E], actual: &[A]) -> f64
    where
        E: AsRef<str>,
        A: AsRef<str>,
    {
        self.evaluate(expected, actual).score
    }

    /// Score `actual` against `expected`, keeping the alignment
    ///
    /// Either side being empty scores `0.0`, and nothing is aligned.
    pub fn evaluate<E, A>(&self, expected: &[E], actual: &[A]) -> Evaluation
    where
        E: AsRef<str>,
        A: AsRef<str>,
    {
        if expected.is_empty() || actual.is_empty() {
            return Evaluation {
                score: 0.0,
                alignment: Alignment::default(),
                denominator: 0.0,
            };
        }

        let alignment = self.aligner.align(expected, actual);

        let (numerator, denominator) = match self.normalization {
            Normalization::CharacterWeighted => {
                let weighted: f64 = alignment
                    .matches()
                    .iter()
                    .map(|m| m.ratio * char_len(actual[m.actual_index].as_ref()) as f64)
                    .sum();
                let denominator = total_chars(expected).max(total_chars(actual));
                (weighted, denominator as f64)
            }
            Normalization::SentenceCount => {
                let denominator = expected.len().max(actual.len());
                (alignment.total_ratio(), denominator as f64)
            }
        };

        let score = if denominator > 0.0 {
            numerator / denominator
        } else {
            0.0
        };

        Evaluation {
            score,
            alignment,
            denominator,
        }
    }
}

/// Score with the default scorer
///
/// # Example
///
/// ```
/// use sentbench_core::score;
///
/// let expected = ["This is test data.", "This is another sentence."];
/// let actual = ["This is test data.", "This is another sentence."];
/// assert_eq!(score(&expected, &actual), 1.0);
/// ```
pub fn score<E, A>(expected: &[E], actual: &[A]) -> f64
where
    E: AsRef<str>,
    A: AsRef<str>,
{
    Scorer::default().score(expected, actual)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn total_chars<S: AsRef<str>>(sentences: &[S]) -> usize {
    sentences.iter().map(|s| char_len(s.as_ref())).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: [&str; 0] = [];

    #[test]
    fn test_perfect_score() {
        let sentences = ["This is test data.", "This is another sentence."];
        assert_eq!(score(&sentences, &sentences), 1.0);
    }

    #[test]
    fn test_empty_sides_score_zero() {
        assert_eq!(score(&EMPTY, &["Something."]), 0.0);
        assert_eq!(score(&["Something."], &EMPTY), 0.0);
        assert_eq!(score(&EMPTY, &EMPTY), 0.0);
    }

    #[test]
    fn test_under_segmentation() {
        let expected = ["Hello world.", "Goodbye."];
        let actual = ["Hello world. Goodbye."];
        let result = score(&expected, &actual);

        // One match of ratio 24/33 weighted by 21 chars, over max(20, 21)
        assert!(result < 1.0);
        assert!((result - 24.0 / 33.0).abs() < 1e-12);
    }

    #[test]
    fn test_over_segmentation() {
        let expected = ["One.", "Two.", "Three."];
        let actual = ["One.", "Two.", "Three.", "Four."];

        let weighted = score(&expected, &actual);
        assert!((weighted - 14.0 / 19.0).abs() < 1e-12);

        let by_count = Scorer::new()
            .with_normalization(Normalization::SentenceCount)
            .score(&expected, &actual);
        assert!((by_count - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_sentence_count_perfect() {
        let scorer = Scorer::new().with_normalization(Normalization::SentenceCount);
        let sentences = ["A.", "B.", "C."];
        assert_eq!(scorer.score(&sentences, &sentences), 1.0);
    }

    #[test]
    fn test_all_empty_strings() {
        assert_eq!(score(&[""], &[""]), 0.0);
    }

    #[test]
    fn test_evaluate_keeps_alignment() {
        let expected = ["One.", "Two."];
        let actual = ["Two.", "One."];
        let evaluation = Scorer::new().evaluate(&expected, &actual);

        assert_eq!(evaluation.score, 1.0);
        assert_eq!(evaluation.denominator, 8.0);
        assert_eq!(evaluation.alignment.matches()[0].expected_index, Some(1));
    }

    #[test]
    fn test_normalization_parsing() {
        assert_eq!(
            "character_weighted".parse::<Normalization>().unwrap(),
            Normalization::CharacterWeighted
        );
        assert_eq!(
            "sentence-count".parse::<Normalization>().unwrap(),
            Normalization::SentenceCount
        );
        assert!("median".parse::<Normalization>().is_err());

        for normalization in Normalization::ALL {
            assert_eq!(
                normalization.to_string().parse::<Normalization>().unwrap(),
                normalization
            );
        }
    }
}
