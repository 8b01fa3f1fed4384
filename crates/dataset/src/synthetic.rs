// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Seeded synthetic vectors.
//!
//! Values are uniform in [-1, 1). The same seed always yields the same corpus,
//! in the same (shuffled) order, so oracle tie-breaks are reproducible.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{DatasetError, Result};
use vecoracle::{RecordId, VectorRecord};

pub struct SyntheticGenerator {
    rng: ChaCha8Rng,
}

impl SyntheticGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn random_vector(&mut self, id: impl Into<RecordId>, dimension: usize) -> VectorRecord {
        let values = (0..dimension).map(|_| self.rng.gen_range(-1.0..1.0)).collect();
        VectorRecord::new(id, values)
    }

    /// `count` vectors with ids `0..count`, shuffled.
    pub fn generate(&mut self, count: usize, dimension: usize) -> Vec<VectorRecord> {
        let mut records: Vec<VectorRecord> = (0..count as u64)
            .map(|id| self.random_vector(id, dimension))
            .collect();
        records.shuffle(&mut self.rng);
        records
    }

    /// Adds uniform noise in [-degree, degree] to every value and clamps to [-1, 1].
    pub fn perturb(&mut self, record: &VectorRecord, degree: f64) -> Result<VectorRecord> {
        if !degree.is_finite() || degree < 0.0 {
            return Err(DatasetError::InvalidParameter {
                name: "perturbation",
                value: degree,
            });
        }
        if degree == 0.0 {
            return Ok(record.clone());
        }
        let values = record
            .values
            .iter()
            .map(|v| (v + self.rng.gen_range(-degree..=degree)).clamp(-1.0, 1.0))
            .collect();
        Ok(VectorRecord::new(record.id, values))
    }

    /// `count` queries near randomly chosen corpus members, with fresh ids
    /// starting at `first_id`.
    pub fn queries(
        &mut self,
        corpus: &[VectorRecord],
        count: usize,
        degree: f64,
        first_id: u64,
    ) -> Result<Vec<VectorRecord>> {
        let mut queries = Vec::with_capacity(count);
        for i in 0..count as u64 {
            let Some(base) = corpus.choose(&mut self.rng) else {
                break;
            };
            let id = first_id
                .checked_add(i)
                .ok_or(DatasetError::IdOverflow { first_id, count })?;
            let mut query = self.perturb(base, degree)?;
            query.id = RecordId(id);
            queries.push(query);
        }
        Ok(queries)
    }
}
