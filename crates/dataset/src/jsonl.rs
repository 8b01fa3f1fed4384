// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! JSON Lines datasets: one `{"id": .., "values": [..]}` per line.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{DatasetError, Result};
use vecoracle::VectorRecord;

pub fn read_jsonl(path: impl AsRef<Path>, dimension: usize) -> Result<Vec<VectorRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: VectorRecord = serde_json::from_str(&line)
            .map_err(|source| DatasetError::Json { line: idx + 1, source })?;
        if record.dimension() != dimension {
            return Err(DatasetError::DimensionMismatch {
                row: records.len(),
                expected: dimension,
                found: record.dimension(),
            });
        }
        records.push(record);
    }

    Ok(records)
}

pub fn write_jsonl(path: impl AsRef<Path>, records: &[VectorRecord]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for (idx, record) in records.iter().enumerate() {
        serde_json::to_writer(&mut writer, record)
            .map_err(|source| DatasetError::Json { line: idx + 1, source })?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
