// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use core::fmt;
use thiserror::Error;

use crate::types::id::RecordId;

/// Which argument of a two-vector operation was at fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Left,
    Right,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Left => f.write_str("left"),
            Operand::Right => f.write_str("right"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    /// Operands of different lengths.
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Zero-norm operand; cosine similarity is undefined.
    #[error("Degenerate vector: {0} operand has zero norm")]
    DegenerateVector(Operand),

    /// A failure while scoring one corpus record.
    #[error("Record {id}: {source}")]
    Record {
        id: RecordId,
        #[source]
        source: Box<OracleError>,
    },

    #[error("Duplicate record id {0} in corpus")]
    DuplicateId(RecordId),

    #[error("Non-finite value at index {index} of vector {id}")]
    NonFiniteValue { id: RecordId, index: usize },

    #[error("Invalid {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

impl OracleError {
    /// Attach the id of the record being processed.
    pub fn at_record(self, id: RecordId) -> Self {
        OracleError::Record {
            id,
            source: Box::new(self),
        }
    }

    /// The underlying error with any record context removed.
    pub fn root(&self) -> &OracleError {
        match self {
            OracleError::Record { source, .. } => source.root(),
            other => other,
        }
    }

    /// Id of the offending record, if one was attached.
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            OracleError::Record { id, .. } => Some(*id),
            OracleError::DuplicateId(id) => Some(*id),
            OracleError::NonFiniteValue { id, .. } => Some(*id),
            _ => None,
        }
    }
}

pub type Result<T> = core::result::Result<T, OracleError>;
