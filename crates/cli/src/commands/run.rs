// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::commands::load::{self, LoadOutcome};
use crate::commands::validate::{self, ValidationRun};
use crate::config::HarnessConfig;

/// Load then validate, reusing the corpus that was just uploaded.
pub async fn run(cfg: &HarnessConfig) -> anyhow::Result<ValidationRun> {
    let client = cfg.client()?;
    let LoadOutcome { corpus, ingest } = load::load_with(cfg, &client).await?;
    println!(
        "Loaded {} vectors in {} batches ({:?}), transaction {}",
        ingest.vectors, ingest.batches, ingest.elapsed, ingest.transaction_id
    );
    validate::validate_with(cfg, client, corpus).await
}
