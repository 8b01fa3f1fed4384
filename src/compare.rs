// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Oracle-vs-service comparison.
//!
//! The oracle answer is ground truth. The service answer is checked for
//! recall, score agreement on the ids both sides returned, and set
//! differences. Whether set differences count as failures depends on the
//! `SearchMode` under test: an exact index must reproduce the oracle, an
//! approximate one is only held to `min_recall`.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_SCORE_TOLERANCE;
use crate::error::{OracleError, Result};
use crate::index::is_ranked;
use crate::types::id::RecordId;
use crate::types::neighbor::Neighbor;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Exact,
    #[default]
    Approximate,
}

/// Scores reported for an id present in both answers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoreDelta {
    pub id: RecordId,
    pub oracle_score: f64,
    pub service_score: f64,
    pub delta: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub mode: SearchMode,
    /// Number of distinct ids in the oracle answer.
    pub k: usize,
    pub tolerance: f64,
    pub min_recall: f64,
    pub recall: f64,
    /// Oracle ids also returned by the service, in oracle order.
    pub matched: Vec<ScoreDelta>,
    /// Subset of `matched` whose delta exceeds `tolerance`.
    pub score_mismatches: Vec<ScoreDelta>,
    /// Returned by the service, absent from the oracle. Service order.
    pub false_positives: Vec<RecordId>,
    /// In the oracle, missed by the service. Oracle order.
    pub false_negatives: Vec<RecordId>,
    /// Ids the service returned more than once.
    pub duplicates: Vec<RecordId>,
    /// Whether the service answer was non-increasing by score.
    pub service_ranked: bool,
}

impl ComparisonReport {
    pub fn passed(&self) -> bool {
        if !self.score_mismatches.is_empty() || !self.duplicates.is_empty() {
            return false;
        }
        match self.mode {
            SearchMode::Exact => self.false_positives.is_empty() && self.false_negatives.is_empty(),
            SearchMode::Approximate => self.recall >= self.min_recall,
        }
    }

    pub fn max_delta(&self) -> Option<f64> {
        self.matched.iter().map(|m| m.delta).reduce(f64::max)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Comparator {
    pub tolerance: f64,
    pub mode: SearchMode,
    pub min_recall: f64,
}

impl Default for Comparator {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_SCORE_TOLERANCE,
            mode: SearchMode::Approximate,
            min_recall: 0.0,
        }
    }
}

impl Comparator {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_min_recall(mut self, min_recall: f64) -> Self {
        self.min_recall = min_recall;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(OracleError::InvalidThreshold {
                name: "tolerance",
                value: self.tolerance,
            });
        }
        if !(0.0..=1.0).contains(&self.min_recall) {
            return Err(OracleError::InvalidThreshold {
                name: "min_recall",
                value: self.min_recall,
            });
        }
        Ok(())
    }

    pub fn compare(&self, oracle: &[Neighbor], service: &[Neighbor]) -> Result<ComparisonReport> {
        self.validate()?;

        // First occurrence wins; later repeats are only reported.
        let mut service_scores: FxHashMap<RecordId, f64> = FxHashMap::default();
        let mut service_order = Vec::with_capacity(service.len());
        let mut duplicates = Vec::new();
        for n in service {
            if service_scores.contains_key(&n.id) {
                if !duplicates.contains(&n.id) {
                    duplicates.push(n.id);
                }
                continue;
            }
            service_scores.insert(n.id, n.score);
            service_order.push(n.id);
        }

        let mut oracle_ids: FxHashSet<RecordId> = FxHashSet::default();
        let mut matched = Vec::new();
        let mut false_negatives = Vec::new();
        for n in oracle {
            if !oracle_ids.insert(n.id) {
                continue;
            }
            match service_scores.get(&n.id) {
                Some(&service_score) => matched.push(ScoreDelta {
                    id: n.id,
                    oracle_score: n.score,
                    service_score,
                    delta: (n.score - service_score).abs(),
                }),
                None => false_negatives.push(n.id),
            }
        }

        let false_positives: Vec<RecordId> = service_order
            .into_iter()
            .filter(|id| !oracle_ids.contains(id))
            .collect();

        // NaN deltas fail too.
        let score_mismatches: Vec<ScoreDelta> = matched
            .iter()
            .filter(|m| !(m.delta <= self.tolerance))
            .copied()
            .collect();

        let k = oracle_ids.len();
        let recall = if k == 0 {
            1.0
        } else {
            matched.len() as f64 / k as f64
        };

        Ok(ComparisonReport {
            mode: self.mode,
            k,
            tolerance: self.tolerance,
            min_recall: self.min_recall,
            recall,
            matched,
            score_mismatches,
            false_positives,
            false_negatives,
            duplicates,
            service_ranked: is_ranked(service),
        })
    }
}

/// Compares in approximate mode with no recall floor.
pub fn compare(oracle: &[Neighbor], service: &[Neighbor], tolerance: f64) -> Result<ComparisonReport> {
    Comparator::new(tolerance).compare(oracle, service)
}
