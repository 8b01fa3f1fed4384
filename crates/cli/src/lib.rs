// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Validation harness: loads a corpus into the service under test and
//! checks its kNN answers against the exact oracle.

pub mod commands;
pub mod config;
pub mod engine;
pub mod report;
pub mod telemetry;
