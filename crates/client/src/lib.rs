// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! REST client for the vector-database service under test, plus the bounded
//! transactional upload pool and, with the `mock` feature, an in-process mock
//! of the service.

pub mod api;
pub mod client;
pub mod errors;
pub mod ingest;
#[cfg(feature = "mock")]
pub mod mock_server;

pub use client::{ClientOptions, VectorDbClient};
pub use errors::{ClientError, Result};
pub use ingest::{upsert_concurrently, IngestOptions, IngestSummary};
