// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;

use crate::config::HarnessConfig;
use crate::engine::{QueryOutcome, ValidationEngine, ValidationSummary};
use crate::report::{self, RunReport};
use vecoracle::{Corpus, VectorRecord};
use vecoracle_client::VectorDbClient;
use vecoracle_dataset::SyntheticGenerator;

pub struct ValidationRun {
    pub summary: ValidationSummary,
    pub outcomes: Vec<QueryOutcome>,
}

/// Rebuilds the corpus from the same seed or dataset that was loaded, then
/// validates the service against it.
pub async fn run(cfg: &HarnessConfig) -> anyhow::Result<ValidationRun> {
    let client = cfg.client()?;
    let corpus = Corpus::with_dimension(cfg.corpus_records()?, cfg.dimension).context("Corpus rejected")?;
    validate_with(cfg, client, corpus).await
}

/// Queries sit near corpus members and carry ids above every corpus id.
pub fn build_queries(cfg: &HarnessConfig, corpus: &Corpus) -> anyhow::Result<Vec<VectorRecord>> {
    let first_id = match corpus.iter().map(|r| r.id.0).max() {
        None => 0,
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| anyhow::anyhow!("Corpus id {} leaves no room for query ids", max))?,
    };
    let queries = SyntheticGenerator::new(cfg.seed.wrapping_add(1)).queries(
        corpus.records(),
        cfg.queries,
        cfg.perturbation,
        first_id,
    )?;
    Ok(queries)
}

pub async fn validate_with(cfg: &HarnessConfig, client: VectorDbClient, corpus: Corpus) -> anyhow::Result<ValidationRun> {
    let queries = build_queries(cfg, &corpus)?;
    let engine = ValidationEngine::new(client, cfg.collection.clone(), corpus, cfg.comparator(), cfg.k)
        .with_concurrency(cfg.concurrency);

    let outcomes = engine.validate_all(queries).await;
    let summary = ValidationSummary::from_outcomes(&outcomes);
    tracing::info!(
        "Validated {} queries: {} passed, {} failed, mean recall {:.4}",
        summary.queries,
        summary.passed,
        summary.failed,
        summary.mean_recall
    );

    report::print(&summary, &outcomes);
    if let Some(path) = &cfg.report {
        RunReport::new(&cfg.collection, engine.corpus(), cfg.mode, cfg.k, &summary, &outcomes).write_json(path)?;
    }

    Ok(ValidationRun { summary, outcomes })
}
