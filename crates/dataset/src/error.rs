// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid JSON on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Row {row}: dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Truncated row at byte offset {offset}")]
    Truncated { offset: usize },
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("Column {0} not found")]
    MissingColumn(String),
    #[error("Column {column} has unsupported type {found}")]
    UnexpectedColumnType { column: String, found: String },
    #[error("Row {row}: null in column {column}")]
    NullValue { column: String, row: usize },
    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),
    #[error("Query ids starting at {first_id} overflow u64 for {count} queries")]
    IdOverflow { first_id: u64, count: usize },
    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, DatasetError>;
