//! Score command implementation

use super::init_logging;
use crate::input::FileReader;
use anyhow::Result;
use clap::Args;
use sentbench_core::{Aligner, Evaluation, Normalization, Scorer};
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the score command
#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Ground-truth segmentation (JSON array or one sentence per line)
    #[arg(short, long, value_name = "FILE")]
    pub expected: PathBuf,

    /// Segmentation to score (JSON array or one sentence per line)
    #[arg(short, long, value_name = "FILE")]
    pub actual: PathBuf,

    /// Score normalization: character_weighted or sentence_count
    #[arg(short, long, value_name = "NAME", default_value = "character_weighted")]
    pub normalization: Normalization,

    /// Disable the popular-character heuristic for long sentences
    #[arg(long)]
    pub no_autojunk: bool,

    /// Print the alignment as JSON
    #[arg(short, long)]
    pub details: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// JSON view of an evaluation
#[derive(Debug, Serialize)]
pub struct ScoreDetails<'a> {
    /// Normalized score
    pub score: f64,
    /// Normalization used
    pub normalization: String,
    /// Denominator used for normalization
    pub denominator: f64,
    /// One entry per actual sentence, in order
    pub matches: Vec<MatchDetail<'a>>,
    /// Expected sentences nothing was aligned to
    pub unmatched_expected: Vec<&'a str>,
}

/// One aligned pair
#[derive(Debug, Serialize)]
pub struct MatchDetail<'a> {
    /// Actual sentence
    pub actual: &'a str,
    /// Expected sentence it was paired with, if any was left
    pub expected: Option<&'a str>,
    /// Similarity ratio
    pub ratio: f64,
}

impl<'a> ScoreDetails<'a> {
    fn new(
        evaluation: &Evaluation,
        normalization: Normalization,
        expected: &'a [String],
        actual: &'a [String],
    ) -> Self {
        let alignment = &evaluation.alignment;
        Self {
            score: evaluation.score,
            normalization: normalization.to_string(),
            denominator: evaluation.denominator,
            matches: alignment
                .matches()
                .iter()
                .map(|m| MatchDetail {
                    actual: &actual[m.actual_index],
                    expected: m.expected_index.map(|i| expected[i].as_str()),
                    ratio: m.ratio,
                })
                .collect(),
            unmatched_expected: alignment
                .unmatched_expected()
                .iter()
                .map(|&i| expected[i].as_str())
                .collect(),
        }
    }
}

impl ScoreArgs {
    /// Execute the score command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, false);

        let expected = FileReader::read_segmentation(&self.expected)?;
        let actual = FileReader::read_segmentation(&self.actual)?;
        log::info!(
            "Scoring {} actual against {} expected sentence(s)",
            actual.len(),
            expected.len()
        );

        let evaluation = self.scorer().evaluate(&expected, &actual);

        if self.details {
            let details = ScoreDetails::new(&evaluation, self.normalization, &expected, &actual);
            println!("{}", serde_json::to_string_pretty(&details)?);
        } else {
            println!("{}", evaluation.score);
        }

        Ok(())
    }

    fn scorer(&self) -> Scorer {
        Scorer::new()
            .with_normalization(self.normalization)
            .with_aligner(Aligner::new().with_autojunk(!self.no_autojunk))
    }
}
