//! Per-provider statistics accumulated over trials

use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// A trial that produced no score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialFailure {
    /// Index of the corpus record
    pub record_index: usize,
    /// Language of the corpus record
    pub lang_code: String,
    /// Error reported by the provider
    pub message: String,
}

/// Accumulator for one provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStats {
    /// Provider id
    pub id: String,
    /// Display name
    pub name: String,
    trials: usize,
    score_sum: f64,
    runtime_sum: f64,
    failures: Vec<TrialFailure>,
}

impl ProviderStats {
    /// Empty statistics for a provider
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trials: 0,
            score_sum: 0.0,
            runtime_sum: 0.0,
            failures: Vec::new(),
        }
    }

    /// Record a scored trial
    pub fn record_success(&mut self, score: f64, runtime: Duration) {
        self.trials += 1;
        self.score_sum += score;
        self.runtime_sum += runtime.as_secs_f64();
    }

    /// Record a trial that failed
    pub fn record_failure(&mut self, failure: TrialFailure) {
        self.failures.push(failure);
    }

    /// Number of scored trials
    pub fn successful_trials(&self) -> usize {
        self.trials
    }

    /// Number of failed trials
    pub fn failed_trials(&self) -> usize {
        self.failures.len()
    }

    /// Failed trials, in the order they happened
    pub fn failures(&self) -> &[TrialFailure] {
        &self.failures
    }

    /// Mean score over scored trials, if any
    pub fn mean_accuracy(&self) -> Option<f64> {
        (self.trials > 0).then(|| self.score_sum / self.trials as f64)
    }

    /// Mean wall-clock seconds per scored trial, if any
    pub fn mean_runtime_secs(&self) -> Option<f64> {
        (self.trials > 0).then(|| self.runtime_sum / self.trials as f64)
    }

    /// Total wall-clock seconds over scored trials
    pub fn total_runtime_secs(&self) -> f64 {
        self.runtime_sum
    }
}

/// Statistics keyed by provider id, in registration order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultsTable {
    entries: Vec<ProviderStats>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ResultsTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert statistics; an existing entry with the same id is replaced in place
    pub fn insert(&mut self, stats: ProviderStats) {
        match self.index.get(&stats.id) {
            Some(&pos) => self.entries[pos] = stats,
            None => {
                self.index.insert(stats.id.clone(), self.entries.len());
                self.entries.push(stats);
            }
        }
    }

    /// Statistics for a provider id
    pub fn get(&self, id: &str) -> Option<&ProviderStats> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    /// Entries in registration order
    pub fn iter(&self) -> std::slice::Iter<'_, ProviderStats> {
        self.entries.iter()
    }

    /// Number of providers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total failed trials across providers
    pub fn total_failures(&self) -> usize {
        self.entries.iter().map(ProviderStats::failed_trials).sum()
    }
}

impl<'a> IntoIterator for &'a ResultsTable {
    type Item = &'a ProviderStats;
    type IntoIter = std::slice::Iter<'a, ProviderStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<ProviderStats> for ResultsTable {
    fn from_iter<I: IntoIterator<Item = ProviderStats>>(iter: I) -> Self {
        let mut table = Self::new();
        for stats in iter {
            table.insert(stats);
        }
        table
    }
}
