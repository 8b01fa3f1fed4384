// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Bounded concurrent upload of a corpus inside one transaction.
//!
//! Batches are dispatched with at most `workers` requests in flight. The first
//! failed batch stops dispatch, cancels what is still in flight, and aborts
//! the transaction. Only a fully uploaded corpus is committed.

use futures::stream::{self, StreamExt};
use std::time::{Duration, Instant};

use crate::api::TransactionId;
use crate::client::VectorDbClient;
use crate::errors::{ClientError, Result};
use vecoracle::VectorRecord;

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub batch_size: usize,
    pub workers: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: 20,
            workers: 32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub transaction_id: TransactionId,
    pub batches: usize,
    pub vectors: usize,
    pub elapsed: Duration,
}

pub async fn upsert_concurrently(
    client: &VectorDbClient,
    collection: &str,
    records: &[VectorRecord],
    options: IngestOptions,
) -> Result<IngestSummary> {
    if options.batch_size == 0 || options.workers == 0 {
        return Err(ClientError::InvalidOption(format!(
            "batch_size and workers must be positive (got {} and {})",
            options.batch_size, options.workers
        )));
    }

    let start = Instant::now();
    let txn = client.create_transaction(collection).await?;
    tracing::info!("Created transaction {} on {}", txn, collection);

    let failure = upload_batches(client, collection, &txn, records, options).await;

    if let Some(err) = failure {
        abort_quietly(client, collection, &txn).await;
        return Err(err);
    }

    if let Err(err) = client.commit(collection, &txn).await {
        tracing::error!("Commit of transaction {} failed: {}", txn, err);
        abort_quietly(client, collection, &txn).await;
        return Err(err);
    }

    let summary = IngestSummary {
        transaction_id: txn,
        batches: records.len().div_ceil(options.batch_size),
        vectors: records.len(),
        elapsed: start.elapsed(),
    };
    tracing::info!(
        "Committed transaction {}: {} vectors in {} batches ({:?})",
        summary.transaction_id,
        summary.vectors,
        summary.batches,
        summary.elapsed
    );
    Ok(summary)
}

/// Returns the first batch failure, if any.
async fn upload_batches(
    client: &VectorDbClient,
    collection: &str,
    txn: &TransactionId,
    records: &[VectorRecord],
    options: IngestOptions,
) -> Option<ClientError> {
    let mut uploads = stream::iter(records.chunks(options.batch_size).enumerate())
        .map(move |(idx, batch)| async move { (idx, batch.len(), client.upsert(collection, txn, batch).await) })
        .buffer_unordered(options.workers);

    while let Some((idx, len, outcome)) = uploads.next().await {
        match outcome {
            Ok(()) => {
                metrics::increment_counter!("vecoracle_batches_upserted_total");
                tracing::debug!("Batch {} ({} vectors) upserted", idx, len);
            }
            Err(e) => {
                metrics::increment_counter!("vecoracle_batch_failures_total");
                tracing::error!("Batch {} failed: {}", idx, e);
                return Some(ClientError::Upsert {
                    batch: idx,
                    source: Box::new(e),
                });
            }
        }
    }
    None
}

async fn abort_quietly(client: &VectorDbClient, collection: &str, txn: &TransactionId) {
    metrics::increment_counter!("vecoracle_transactions_aborted_total");
    match client.abort(collection, txn).await {
        Ok(()) => tracing::warn!("Aborted transaction {}", txn),
        Err(e) => tracing::error!("Failed to abort transaction {}: {}", txn, e),
    }
}
