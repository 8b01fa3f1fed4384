// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Brute-force exact kNN.

use crate::corpus::Corpus;
use crate::error::{Operand, OracleError, Result};
use crate::index::by_score_desc;
use crate::math::cosine::{norm, similarity};
use crate::types::neighbor::{Neighbor, RankedList};
use crate::types::vector::VectorRecord;

/// Scores every corpus record against `query` and returns the best `k`.
///
/// Ties keep corpus order. A bad query is rejected up front with its own id
/// attached. A record that cannot be scored aborts this search with the record
/// id attached; the caller decides whether other queries go on.
pub fn bruteforce_search(corpus: &Corpus, query: &VectorRecord, k: usize) -> Result<RankedList> {
    validate_query(corpus, query)?;

    let mut scored: Vec<Neighbor> = Vec::with_capacity(corpus.len());
    for record in corpus.iter() {
        let score = similarity(&query.values, &record.values)
            .map_err(|e| e.at_record(record.id))?;
        scored.push(Neighbor {
            id: record.id,
            score,
        });
    }

    // Stable: equal scores stay in corpus order.
    scored.sort_by(by_score_desc);
    scored.truncate(k);
    Ok(scored)
}

fn validate_query(corpus: &Corpus, query: &VectorRecord) -> Result<()> {
    query.ensure_finite()?;
    if !corpus.is_empty() && query.dimension() != corpus.dimension() {
        return Err(OracleError::DimensionMismatch {
            expected: corpus.dimension(),
            found: query.dimension(),
        }
        .at_record(query.id));
    }
    if norm(&query.values) == 0.0 {
        return Err(OracleError::DegenerateVector(Operand::Left).at_record(query.id));
    }
    Ok(())
}
