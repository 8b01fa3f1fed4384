// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;

use crate::config::HarnessConfig;
use vecoracle::{Corpus, VectorRecord};
use vecoracle_client::api::{CreateCollectionRequest, CreateIndexRequest};
use vecoracle_client::{upsert_concurrently, IngestSummary, VectorDbClient};

const CONFLICT: u16 = 409;

pub struct LoadOutcome {
    pub corpus: Corpus,
    pub ingest: IngestSummary,
}

pub async fn run(cfg: &HarnessConfig) -> anyhow::Result<LoadOutcome> {
    let client = cfg.client()?;
    load_with(cfg, &client).await
}

/// Builds the corpus, prepares the collection and uploads every record.
///
/// The corpus is validated before anything is sent, so a malformed dataset
/// never produces a half-filled collection.
pub async fn load_with(cfg: &HarnessConfig, client: &VectorDbClient) -> anyhow::Result<LoadOutcome> {
    let records = cfg.corpus_records()?;
    let corpus = Corpus::with_dimension(records, cfg.dimension).context("Corpus rejected")?;
    tracing::info!(
        "Corpus ready: {} vectors, dim {}, fingerprint {}",
        corpus.len(),
        corpus.dimension(),
        corpus.fingerprint().to_hex()
    );
    metrics::gauge!("vecoracle_corpus_vectors", corpus.len() as f64);

    let req = CreateCollectionRequest::dense(
        &cfg.collection,
        Some("Oracle validation corpus".to_string()),
        cfg.dimension,
    );
    match client.create_collection(&req).await {
        Ok(_) => tracing::info!("Created collection {}", cfg.collection),
        Err(e) if e.status() == Some(CONFLICT) => {
            tracing::warn!("Collection {} already exists, reusing it", cfg.collection)
        }
        Err(e) => return Err(e).context("Failed to create collection"),
    }

    if cfg.create_index {
        match client.create_index(&CreateIndexRequest::hnsw_cosine(&cfg.collection)).await {
            Ok(_) => tracing::info!("Created HNSW index on {}", cfg.collection),
            Err(e) if e.status() == Some(CONFLICT) => {
                tracing::warn!("Index on {} already exists", cfg.collection)
            }
            Err(e) => return Err(e).context("Failed to create index"),
        }
    }

    let ingest = upsert_concurrently(client, &cfg.collection, corpus.records(), cfg.ingest_options())
        .await
        .context("Upload failed")?;

    read_back(cfg, client, &corpus).await?;

    Ok(LoadOutcome { corpus, ingest })
}

/// Fetches up to `cfg.readback` evenly spaced records and checks that the
/// service stored them within `cfg.tolerance`.
async fn read_back(cfg: &HarnessConfig, client: &VectorDbClient, corpus: &Corpus) -> anyhow::Result<()> {
    for expected in readback_sample(corpus.records(), cfg.readback) {
        let stored = client
            .fetch_vector(&cfg.collection, expected.id)
            .await
            .with_context(|| format!("Failed to read back vector {}", expected.id))?;
        if stored.dimension() != expected.dimension() {
            anyhow::bail!(
                "Vector {} read back with dimension {}, expected {}",
                expected.id,
                stored.dimension(),
                expected.dimension()
            );
        }
        let drift = expected
            .values
            .iter()
            .zip(&stored.values)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        if drift > cfg.tolerance {
            anyhow::bail!("Vector {} read back with drift {:.3e} over tolerance {:.3e}", expected.id, drift, cfg.tolerance);
        }
    }
    tracing::info!("Read back {} vectors", cfg.readback.min(corpus.len()));
    Ok(())
}

fn readback_sample(records: &[VectorRecord], n: usize) -> impl Iterator<Item = &VectorRecord> {
    let n = n.min(records.len());
    let step = if n == 0 { 1 } else { records.len() / n };
    records.iter().step_by(step.max(1)).take(n)
}
