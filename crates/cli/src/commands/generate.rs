// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use std::path::Path;

use vecoracle::Corpus;
use vecoracle_dataset::{columnar, fvecs, jsonl, SyntheticGenerator};

/// Writes `count` seeded vectors to `output`; the extension picks the format.
pub fn run(output: &Path, count: usize, dimension: usize, seed: u64) -> anyhow::Result<Corpus> {
    let records = SyntheticGenerator::new(seed).generate(count, dimension);
    let corpus = Corpus::with_dimension(records, dimension)?;

    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let written = match ext.as_str() {
        "fvecs" => fvecs::write_fvecs(output, corpus.records()),
        "jsonl" | "ndjson" => jsonl::write_jsonl(output, corpus.records()),
        "parquet" => columnar::write_parquet(output, corpus.records()),
        other => anyhow::bail!("Unsupported output format {:?} (use .fvecs, .jsonl or .parquet)", other),
    };
    written.with_context(|| format!("Failed to write {:?}", output))?;

    println!(
        "Wrote {} vectors (dim {}, seed {}) to {:?}\nFingerprint: {}",
        corpus.len(),
        dimension,
        seed,
        output,
        corpus.fingerprint().to_hex()
    );
    Ok(corpus)
}
