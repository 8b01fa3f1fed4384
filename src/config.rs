// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Oracle defaults.

/// Neighbors requested when the caller does not choose `k`.
pub const DEFAULT_K: usize = 5;

/// Largest |oracle - service| score delta accepted for a matched id.
/// Services that quantize vectors to u8 drift by roughly this much.
pub const DEFAULT_SCORE_TOLERANCE: f64 = 1e-2;
