// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};

use crate::types::id::RecordId;

/// One entry of a ranked search answer. `score` is a cosine similarity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: RecordId,
    pub score: f64,
}

impl Neighbor {
    pub fn new(id: impl Into<RecordId>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Neighbors ordered by descending score, at most `k` long.
pub type RankedList = Vec<Neighbor>;
