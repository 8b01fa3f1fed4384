// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! TEXMEX `.fvecs` reader and writer.
//!
//! Format: for each row, `[dim: i32 LE] [dim x f32 LE]`. Row index is the id.

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{DatasetError, Result};
use vecoracle::VectorRecord;

pub fn read_fvecs(path: impl AsRef<Path>, dimension: usize) -> Result<Vec<VectorRecord>> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(Vec::new());
    }
    // SAFETY: the map is read-only and dropped before returning.
    let mmap = unsafe { Mmap::map(&file)? };
    parse_fvecs(&mmap, dimension)
}

pub fn parse_fvecs(bytes: &[u8], dimension: usize) -> Result<Vec<VectorRecord>> {
    let mut records = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        if bytes.len() - offset < 4 {
            return Err(DatasetError::Truncated { offset });
        }
        let dim = LittleEndian::read_i32(&bytes[offset..offset + 4]);
        let row = records.len();
        if dim < 0 || dim as usize != dimension {
            return Err(DatasetError::DimensionMismatch {
                row,
                expected: dimension,
                found: dim.max(0) as usize,
            });
        }

        let start = offset + 4;
        let end = start + dimension * 4;
        if end > bytes.len() {
            return Err(DatasetError::Truncated { offset });
        }

        let mut raw = vec![0f32; dimension];
        LittleEndian::read_f32_into(&bytes[start..end], &mut raw);
        let values = raw.into_iter().map(f64::from).collect();

        records.push(VectorRecord::new(row as u64, values));
        offset = end;
    }

    Ok(records)
}

/// Writes rows in the order given. Ids are not stored; values are narrowed to f32.
pub fn write_fvecs(path: impl AsRef<Path>, records: &[VectorRecord]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        writer.write_i32::<LittleEndian>(record.dimension() as i32)?;
        for &v in &record.values {
            writer.write_f32::<LittleEndian>(v as f32)?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(dim: i32, values: &[f32]) -> Vec<u8> {
        let mut buf = dim.to_le_bytes().to_vec();
        for v in values {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

    #[test]
    fn test_parse_two_rows() {
        let mut bytes = row(2, &[1.0, 0.5]);
        bytes.extend(row(2, &[-0.25, 0.0]));

        let records = parse_fvecs(&bytes, 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id.0, 1);
        assert_eq!(records[1].values, vec![-0.25, 0.0]);
    }

    #[test]
    fn test_wrong_row_dimension() {
        let mut bytes = row(2, &[1.0, 0.5]);
        bytes.extend(row(3, &[1.0, 0.5, 0.1]));
        assert!(matches!(
            parse_fvecs(&bytes, 2),
            Err(DatasetError::DimensionMismatch { row: 1, expected: 2, found: 3 })
        ));
    }

    #[test]
    fn test_truncated_row() {
        let mut bytes = row(2, &[1.0, 0.5]);
        bytes.truncate(9);
        assert!(matches!(
            parse_fvecs(&bytes, 2),
            Err(DatasetError::Truncated { offset: 0 })
        ));
    }
}
