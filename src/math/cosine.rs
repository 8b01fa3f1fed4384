// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Cosine similarity in f64.

use crate::error::{Operand, OracleError, Result};

/// Dot product of two equal-length slices.
///
/// Accumulates from `+0.0` in index order so that the result is identical for
/// `dot(a, b)` and `dot(b, a)`.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimension mismatch");
    a.iter().zip(b).fold(0.0, |acc, (x, y)| acc + x * y)
}

/// Euclidean (L2) norm.
#[inline]
pub fn norm(a: &[f64]) -> f64 {
    a.iter().fold(0.0, |acc, x| acc + x * x).sqrt()
}

/// `dot(a, b) / (||a|| * ||b||)`.
///
/// Fails with `DimensionMismatch` when the lengths differ and with
/// `DegenerateVector` when either norm is exactly zero. The result is not
/// clamped, so rounding may push it marginally outside [-1, 1].
pub fn similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(OracleError::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }

    let norm_a = norm(a);
    if norm_a == 0.0 {
        return Err(OracleError::DegenerateVector(Operand::Left));
    }
    let norm_b = norm(b);
    if norm_b == 0.0 {
        return Err(OracleError::DegenerateVector(Operand::Right));
    }

    Ok(dot(a, b) / (norm_a * norm_b))
}
