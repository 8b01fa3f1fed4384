// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! vecoracle: an exact cosine-similarity kNN oracle used as ground truth when
//! validating approximate search results returned by a vector database.

pub mod config;
pub mod error;
pub mod types;
pub mod corpus;
pub mod math;
pub mod index;
pub mod compare;

#[cfg(test)]
pub mod tests;

pub use compare::{compare, Comparator, ComparisonReport, ScoreDelta, SearchMode};
pub use corpus::Corpus;
pub use error::{OracleError, Result};
pub use index::brute_force::bruteforce_search;
pub use math::cosine::similarity;
pub use types::id::RecordId;
pub use types::neighbor::{Neighbor, RankedList};
pub use types::vector::VectorRecord;
