//! Greedy best-match alignment between two segmentations
//!
//! Each actual sentence, taken in order, is paired with the remaining
//! expected sentence it most resembles. An expected sentence is consumed by
//! at most one match. Once the pool runs dry, further actual sentences get a
//! zero-ratio match with no partner.

use crate::similarity::SequenceMatcher;

/// One actual sentence paired with its best remaining expected sentence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Index into the actual segmentation
    pub actual_index: usize,
    /// Index into the expected segmentation, `None` if the pool was empty
    pub expected_index: Option<usize>,
    /// Similarity ratio in `[0.0, 1.0]`
    pub ratio: f64,
}

/// Result of aligning an actual segmentation against an expected one
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Alignment {
    matches: Vec<Match>,
    unmatched_expected: Vec<usize>,
}

impl Alignment {
    /// Matches in actual order, exactly one per actual sentence
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Per-actual-sentence ratios in actual order
    pub fn ratios(&self) -> impl Iterator<Item = f64> + '_ {
        self.matches.iter().map(|m| m.ratio)
    }

    /// Sum of all match ratios
    pub fn total_ratio(&self) -> f64 {
        self.ratios().sum()
    }

    /// Indices of expected sentences that were never selected, ascending
    pub fn unmatched_expected(&self) -> &[usize] {
        &self.unmatched_expected
    }

    /// Number of matches that consumed an expected sentence
    pub fn matched_count(&self) -> usize {
        self.matches
            .iter()
            .filter(|m| m.expected_index.is_some())
            .count()
    }
}

/// Greedy sequence aligner
#[derive(Debug, Clone, Copy)]
pub struct Aligner {
    autojunk: bool,
}

impl Default for Aligner {
    fn default() -> Self {
        Self { autojunk: true }
    }
}

impl Aligner {
    /// Create an aligner with the autojunk heuristic enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the popular-character heuristic for long sentences
    pub fn with_autojunk(mut self, autojunk: bool) -> Self {
        self.autojunk = autojunk;
        self
    }

    /// Whether the autojunk heuristic is enabled
    pub fn autojunk(&self) -> bool {
        self.autojunk
    }

    /// Align `actual` against `expected`
    ///
    /// Ties between equally similar expected sentences go to the one that
    /// comes first in the remaining pool.
    pub fn align<E, A>(&self, expected: &[E], actual: &[A]) -> Alignment
    where
        E: AsRef<str>,
        A: AsRef<str>,
    {
        // The pool keeps expected order so that ties resolve to the earliest entry
        let mut pool: Vec<(usize, SequenceMatcher)> = expected
            .iter()
            .enumerate()
            .map(|(idx, s)| (idx, SequenceMatcher::with_autojunk(s.as_ref(), self.autojunk)))
            .collect();

        let mut matches = Vec::with_capacity(actual.len());

        for (actual_index, sentence) in actual.iter().enumerate() {
            let chars: Vec<char> = sentence.as_ref().chars().collect();

            let mut best: Option<(usize, f64)> = None;
            for (pos, (_, matcher)) in pool.iter().enumerate() {
                if let Some((_, best_ratio)) = best {
                    // Only a strictly greater ratio can replace the current best
                    if matcher.real_quick_ratio(&chars) <= best_ratio
                        || matcher.quick_ratio(&chars) <= best_ratio
                    {
                        continue;
                    }
                }
                let ratio = matcher.ratio(&chars);
                match best {
                    Some((_, best_ratio)) if ratio <= best_ratio => {}
                    _ => best = Some((pos, ratio)),
                }
            }

            let m = match best {
                Some((pos, ratio)) => {
                    let (expected_index, _) = pool.remove(pos);
                    Match {
                        actual_index,
                        expected_index: Some(expected_index),
                        ratio,
                    }
                }
                None => Match {
                    actual_index,
                    expected_index: None,
                    ratio: 0.0,
                },
            };
            matches.push(m);
        }

        Alignment {
            matches,
            unmatched_expected: pool.into_iter().map(|(idx, _)| idx).collect(),
        }
    }
}

/// Align with the default aligner
pub fn align<E, A>(expected: &[E], actual: &[A]) -> Alignment
where
    E: AsRef<str>,
    A: AsRef<str>,
{
    Aligner::default().align(expected, actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_segmentations() {
        let sentences = ["This is test data.", "This is another sentence."];
        let alignment = align(&sentences, &sentences);

        assert_eq!(alignment.matches().len(), 2);
        assert_eq!(alignment.matches()[0].expected_index, Some(0));
        assert_eq!(alignment.matches()[1].expected_index, Some(1));
        assert!(alignment.ratios().all(|r| r == 1.0));
        assert!(alignment.unmatched_expected().is_empty());
    }

    #[test]
    fn test_order_independent_selection() {
        let expected = ["Second one here.", "First sentence."];
        let actual = ["First sentence.", "Second one here."];
        let alignment = align(&expected, &actual);

        assert_eq!(alignment.matches()[0].expected_index, Some(1));
        assert_eq!(alignment.matches()[1].expected_index, Some(0));
        assert_eq!(alignment.total_ratio(), 2.0);
    }

    #[test]
    fn test_tie_goes_to_first_in_pool() {
        let expected = ["ax", "ay"];
        let actual = ["ab"];
        let alignment = align(&expected, &actual);

        assert_eq!(alignment.matches()[0].expected_index, Some(0));
        assert_eq!(alignment.matches()[0].ratio, 0.5);
        assert_eq!(alignment.unmatched_expected(), &[1]);
    }

    #[test]
    fn test_exhausted_pool_gives_zero() {
        let expected = ["One.", "Two.", "Three."];
        let actual = ["One.", "Two.", "Three.", "Four."];
        let alignment = align(&expected, &actual);

        let last = alignment.matches()[3];
        assert_eq!(last.expected_index, None);
        assert_eq!(last.ratio, 0.0);
        assert_eq!(alignment.matched_count(), 3);
    }

    #[test]
    fn test_under_segmentation_leaves_expected_unmatched() {
        let expected = ["Hello world.", "Goodbye."];
        let actual = ["Hello world. Goodbye."];
        let alignment = align(&expected, &actual);

        assert_eq!(alignment.matches()[0].expected_index, Some(0));
        assert!((alignment.matches()[0].ratio - 24.0 / 33.0).abs() < 1e-12);
        assert_eq!(alignment.unmatched_expected(), &[1]);
    }

    #[test]
    fn test_empty_expected() {
        let expected: [&str; 0] = [];
        let alignment = align(&expected, &["Anything."]);
        assert_eq!(alignment.matches().len(), 1);
        assert_eq!(alignment.matches()[0].expected_index, None);
        assert_eq!(alignment.total_ratio(), 0.0);
    }

    #[test]
    fn test_empty_actual() {
        let actual: [&str; 0] = [];
        let alignment = align(&["Anything."], &actual);
        assert!(alignment.matches().is_empty());
        assert_eq!(alignment.unmatched_expected(), &[0]);
    }

    #[test]
    fn test_duplicate_expected_consumed_once_each() {
        let expected = ["Yes.", "Yes."];
        let actual = ["Yes.", "Yes.", "Yes."];
        let alignment = align(&expected, &actual);

        let picked: Vec<_> = alignment
            .matches()
            .iter()
            .map(|m| m.expected_index)
            .collect();
        assert_eq!(picked, vec![Some(0), Some(1), None]);
    }

    #[test]
    fn test_accepts_owned_strings() {
        let expected = vec!["A b c.".to_string()];
        let actual = vec![String::from("A b c.")];
        assert_eq!(align(&expected, &actual).total_ratio(), 1.0);
    }
}
