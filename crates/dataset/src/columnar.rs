// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Columnar corpora: Parquet files with an integer id column and a list-of-float
//! embedding column (`id` and `emb` by default).
//!
//! Ids of any integer type are widened to u64; embeddings may be `List` or
//! `FixedSizeList` of f32 or f64. Every row must carry exactly `dimension`
//! values. Nulls are rejected.

use arrow::array::{Array, ArrayRef, AsArray, Float64Builder, ListBuilder, UInt64Array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Float64Type, UInt64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::error::{DatasetError, Result};
use vecoracle::VectorRecord;

pub const ID_COLUMN: &str = "id";
pub const EMBEDDING_COLUMN: &str = "emb";

pub fn read_parquet(path: impl AsRef<Path>, dimension: usize) -> Result<Vec<VectorRecord>> {
    read_parquet_columns(path, dimension, ID_COLUMN, EMBEDDING_COLUMN)
}

pub fn read_parquet_columns(
    path: impl AsRef<Path>,
    dimension: usize,
    id_column: &str,
    embedding_column: &str,
) -> Result<Vec<VectorRecord>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        append_batch(&batch, dimension, id_column, embedding_column, &mut records)?;
    }
    Ok(records)
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
}

fn unexpected(column: &str, data_type: &DataType) -> DatasetError {
    DatasetError::UnexpectedColumnType {
        column: column.to_string(),
        found: data_type.to_string(),
    }
}

fn append_batch(
    batch: &RecordBatch,
    dimension: usize,
    id_column: &str,
    embedding_column: &str,
    records: &mut Vec<VectorRecord>,
) -> Result<()> {
    let raw_ids = column(batch, id_column)?;
    if !raw_ids.data_type().is_integer() {
        return Err(unexpected(id_column, raw_ids.data_type()));
    }
    // Negative ids do not survive the cast and surface as nulls below.
    let ids = cast(raw_ids, &DataType::UInt64)?;
    let ids = ids
        .as_primitive_opt::<UInt64Type>()
        .ok_or_else(|| unexpected(id_column, raw_ids.data_type()))?;

    let raw_emb = column(batch, embedding_column)?;
    match raw_emb.data_type() {
        DataType::List(f) | DataType::LargeList(f) | DataType::FixedSizeList(f, _) if f.data_type().is_floating() => {}
        other => return Err(unexpected(embedding_column, other)),
    }
    let list_type = DataType::List(Arc::new(Field::new("item", DataType::Float64, true)));
    let embeddings = cast(raw_emb, &list_type)?;
    let embeddings = embeddings
        .as_list_opt::<i32>()
        .ok_or_else(|| unexpected(embedding_column, raw_emb.data_type()))?;

    for i in 0..batch.num_rows() {
        let row = records.len();
        if ids.is_null(i) {
            return Err(DatasetError::NullValue {
                column: id_column.to_string(),
                row,
            });
        }
        if embeddings.is_null(i) {
            return Err(DatasetError::NullValue {
                column: embedding_column.to_string(),
                row,
            });
        }

        let values = embeddings.value(i);
        let values = values.as_primitive::<Float64Type>();
        if values.null_count() > 0 {
            return Err(DatasetError::NullValue {
                column: embedding_column.to_string(),
                row,
            });
        }
        if values.len() != dimension {
            return Err(DatasetError::DimensionMismatch {
                row,
                expected: dimension,
                found: values.len(),
            });
        }

        records.push(VectorRecord::new(ids.value(i), values.values().to_vec()));
    }
    Ok(())
}

/// Writes `id: UInt64` and `emb: List<Float64>` in a single row group.
pub fn write_parquet(path: impl AsRef<Path>, records: &[VectorRecord]) -> Result<()> {
    let ids = UInt64Array::from_iter_values(records.iter().map(|r| r.id.0));
    let mut emb = ListBuilder::new(Float64Builder::new());
    for record in records {
        emb.values().append_slice(&record.values);
        emb.append(true);
    }

    let batch = RecordBatch::try_from_iter(vec![
        (ID_COLUMN, Arc::new(ids) as ArrayRef),
        (EMBEDDING_COLUMN, Arc::new(emb.finish()) as ArrayRef),
    ])?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(File::create(path)?, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
