// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Immutable, validated set of vector records.
//!
//! A corpus is built once, before any search runs, and is never mutated
//! afterwards. Record order is fixed at construction: it is the tie-break
//! order for equal scores, and it is folded into a BLAKE3 fingerprint so two
//! runs can prove they searched the same corpus in the same order.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{OracleError, Result};
use crate::index::brute_force::bruteforce_search;
use crate::types::id::RecordId;
use crate::types::neighbor::RankedList;
use crate::types::vector::VectorRecord;

#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<VectorRecord>,
    positions: FxHashMap<RecordId, usize>,
    dimension: usize,
    fingerprint: blake3::Hash,
}

impl Corpus {
    /// Builds a corpus whose dimension is taken from the first record.
    pub fn new(records: Vec<VectorRecord>) -> Result<Self> {
        let dimension = records.first().map(VectorRecord::dimension).unwrap_or(0);
        Self::with_dimension(records, dimension)
    }

    /// Builds a corpus, requiring every record to have exactly `dimension` values.
    pub fn with_dimension(records: Vec<VectorRecord>, dimension: usize) -> Result<Self> {
        let mut seen = FxHashSet::default();
        let mut positions = FxHashMap::default();
        positions.reserve(records.len());

        for (pos, record) in records.iter().enumerate() {
            if record.dimension() != dimension {
                return Err(OracleError::DimensionMismatch {
                    expected: dimension,
                    found: record.dimension(),
                }
                .at_record(record.id));
            }
            record.ensure_finite()?;
            if !seen.insert(record.id) {
                return Err(OracleError::DuplicateId(record.id));
            }
            positions.insert(record.id, pos);
        }

        let fingerprint = fingerprint(&records, dimension);
        Ok(Self {
            records,
            positions,
            dimension,
            fingerprint,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Records in their fixed corpus order.
    pub fn records(&self) -> &[VectorRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &VectorRecord> {
        self.records.iter()
    }

    pub fn get(&self, id: RecordId) -> Option<&VectorRecord> {
        self.positions.get(&id).map(|&pos| &self.records[pos])
    }

    /// Position of `id` in corpus order.
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// BLAKE3 over dimension, then every (id, values) pair in corpus order.
    pub fn fingerprint(&self) -> blake3::Hash {
        self.fingerprint
    }

    /// Exact top-`k` by cosine similarity.
    pub fn search(&self, query: &VectorRecord, k: usize) -> Result<RankedList> {
        bruteforce_search(self, query, k)
    }
}

fn fingerprint(records: &[VectorRecord], dimension: usize) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(dimension as u64).to_le_bytes());
    for record in records {
        hasher.update(&record.id.0.to_le_bytes());
        for value in &record.values {
            hasher.update(&value.to_le_bytes());
        }
    }
    hasher.finalize()
}
