// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Corpus sources for the oracle: seeded synthetic vectors and on-disk datasets.

pub mod error;
pub mod fvecs;
pub mod jsonl;
pub mod columnar;
pub mod synthetic;

use std::path::Path;

pub use error::{DatasetError, Result};
pub use synthetic::SyntheticGenerator;

use vecoracle::VectorRecord;

/// Loads a dataset, choosing the reader from the file extension.
///
/// Every row must have exactly `dimension` values.
pub fn load(path: impl AsRef<Path>, dimension: usize) -> Result<Vec<VectorRecord>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let records = match ext.as_str() {
        "fvecs" => fvecs::read_fvecs(path, dimension)?,
        "jsonl" | "ndjson" => jsonl::read_jsonl(path, dimension)?,
        "parquet" => columnar::read_parquet(path, dimension)?,
        _ => return Err(DatasetError::UnsupportedFormat(path.display().to_string())),
    };
    tracing::info!("Loaded {} vectors (dim {}) from {:?}", records.len(), dimension, path);
    Ok(records)
}
