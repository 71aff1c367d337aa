//! Alignment-based similarity scoring for sentence segmentations
//!
//! Compares a candidate segmentation (what a sentence splitter produced)
//! against a ground-truth segmentation. The two may disagree on sentence
//! count, boundaries and whitespace:
//!
//! - [`similarity`]: matching-blocks ratio between two strings
//! - [`alignment`]: greedy best-match pairing without reuse
//! - [`scoring`]: normalization of the aligned ratios into one score
//!
//! Everything here is pure and never fails.

#![warn(missing_docs)]

pub mod alignment;
pub mod scoring;
pub mod similarity;

pub use alignment::{align, Aligner, Alignment, Match};
pub use scoring::{score, Evaluation, Normalization, Scorer, UnknownNormalization};
pub use similarity::{ratio, MatchingBlock, SequenceMatcher};
