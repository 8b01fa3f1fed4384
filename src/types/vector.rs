// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Dense vector records.

use serde::{Deserialize, Serialize};

use crate::error::{OracleError, Result};
use crate::types::id::RecordId;

/// A vector together with its id. Corpus members and queries share this shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: RecordId,
    pub values: Vec<f64>,
}

impl VectorRecord {
    pub fn new(id: impl Into<RecordId>, values: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Rejects NaN and infinite components.
    pub fn ensure_finite(&self) -> Result<()> {
        match self.values.iter().position(|v| !v.is_finite()) {
            Some(index) => Err(OracleError::NonFiniteValue { id: self.id, index }),
            None => Ok(()),
        }
    }
}
