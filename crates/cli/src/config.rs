// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use vecoracle::config::{DEFAULT_K, DEFAULT_SCORE_TOLERANCE};
use vecoracle::{Comparator, SearchMode, VectorRecord};
use vecoracle_client::{ClientOptions, IngestOptions, VectorDbClient};
use vecoracle_dataset::SyntheticGenerator;

pub const DEFAULT_HOST: &str = "http://127.0.0.1:8443";
pub const DEFAULT_COLLECTION: &str = "testdb";
pub const DEFAULT_DIMENSION: usize = 5;
pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_BATCH_COUNT: usize = 100;
pub const DEFAULT_WORKERS: usize = 32;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_QUERIES: usize = 100;
pub const DEFAULT_PERTURBATION: f64 = 0.25;
pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_READBACK: usize = 10;

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub host: String,
    pub token: Option<String>,
    pub insecure: bool,
    pub timeout: Option<Duration>,
    pub collection: String,
    pub dimension: usize,
    /// Synthetic corpus size; ignored when `dataset` is set.
    pub count: usize,
    pub seed: u64,
    pub dataset: Option<PathBuf>,
    pub create_index: bool,
    pub batch_size: usize,
    pub workers: usize,
    /// Records fetched back after upload and compared value by value. 0 skips.
    pub readback: usize,
    pub k: usize,
    pub tolerance: f64,
    pub min_recall: f64,
    pub mode: SearchMode,
    pub queries: usize,
    pub perturbation: f64,
    /// Queries validated concurrently.
    pub concurrency: usize,
    /// Where to write the JSON comparison report.
    pub report: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            token: None,
            insecure: true,
            timeout: Some(Duration::from_secs(30)),
            collection: DEFAULT_COLLECTION.to_string(),
            dimension: DEFAULT_DIMENSION,
            count: DEFAULT_BATCH_SIZE * DEFAULT_BATCH_COUNT,
            seed: DEFAULT_SEED,
            dataset: None,
            create_index: true,
            batch_size: DEFAULT_BATCH_SIZE,
            workers: DEFAULT_WORKERS,
            readback: DEFAULT_READBACK,
            k: DEFAULT_K,
            tolerance: DEFAULT_SCORE_TOLERANCE,
            min_recall: 0.0,
            mode: SearchMode::Approximate,
            queries: DEFAULT_QUERIES,
            perturbation: DEFAULT_PERTURBATION,
            concurrency: DEFAULT_CONCURRENCY,
            report: None,
        }
    }
}

impl HarnessConfig {
    pub fn client(&self) -> anyhow::Result<VectorDbClient> {
        VectorDbClient::connect(
            &self.host,
            ClientOptions {
                token: self.token.clone(),
                accept_invalid_certs: self.insecure,
                timeout: self.timeout,
            },
        )
        .context("Failed to build HTTP client")
    }

    pub fn comparator(&self) -> Comparator {
        Comparator::new(self.tolerance)
            .with_mode(self.mode)
            .with_min_recall(self.min_recall)
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            batch_size: self.batch_size,
            workers: self.workers,
        }
    }

    /// The corpus records: the dataset file if one is configured, otherwise
    /// `count` synthetic vectors from `seed`. Same config, same records.
    pub fn corpus_records(&self) -> anyhow::Result<Vec<VectorRecord>> {
        match &self.dataset {
            Some(path) => vecoracle_dataset::load(path, self.dimension)
                .with_context(|| format!("Failed to load dataset {:?}", path)),
            None => Ok(SyntheticGenerator::new(self.seed).generate(self.count, self.dimension)),
        }
    }
}

/// Flags shared by `load`, `validate` and `run`.
#[derive(Args, Debug, Clone)]
pub struct HarnessArgs {
    /// Service host, without the /vectordb prefix
    #[arg(long, env = "VECORACLE_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Bearer token
    #[arg(long, env = "VECORACLE_TOKEN")]
    pub token: Option<String>,

    /// Verify TLS certificates (off by default; test servers use self-signed certs)
    #[arg(long)]
    pub verify_tls: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    #[arg(long, default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    #[arg(long, default_value_t = DEFAULT_DIMENSION)]
    pub dimension: usize,

    /// Synthetic corpus size
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE * DEFAULT_BATCH_COUNT)]
    pub count: usize,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Load the corpus from a .fvecs, .jsonl or .parquet file instead of generating it
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Skip creating the explicit HNSW index
    #[arg(long)]
    pub no_index: bool,

    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Concurrent upsert requests
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Vectors fetched back after upload and checked against the corpus (0 skips)
    #[arg(long, default_value_t = DEFAULT_READBACK)]
    pub readback: usize,

    #[arg(long, short, default_value_t = DEFAULT_K)]
    pub k: usize,

    /// Maximum accepted score delta for a matched id
    #[arg(long, default_value_t = DEFAULT_SCORE_TOLERANCE)]
    pub tolerance: f64,

    /// Minimum recall@k per query (approximate mode)
    #[arg(long, default_value_t = 0.0)]
    pub min_recall: f64,

    /// The service index is exact: any set difference fails
    #[arg(long)]
    pub exact: bool,

    /// Number of validation queries
    #[arg(long, default_value_t = DEFAULT_QUERIES)]
    pub queries: usize,

    /// Noise added to corpus vectors to derive queries
    #[arg(long, default_value_t = DEFAULT_PERTURBATION)]
    pub perturbation: f64,

    /// Queries validated concurrently
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Write the per-query comparison report as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl From<HarnessArgs> for HarnessConfig {
    fn from(args: HarnessArgs) -> Self {
        Self {
            host: args.host,
            token: args.token,
            insecure: !args.verify_tls,
            timeout: Some(Duration::from_secs(args.timeout_secs)),
            collection: args.collection,
            dimension: args.dimension,
            count: args.count,
            seed: args.seed,
            dataset: args.dataset,
            create_index: !args.no_index,
            batch_size: args.batch_size,
            workers: args.workers,
            readback: args.readback,
            k: args.k,
            tolerance: args.tolerance,
            min_recall: args.min_recall,
            mode: if args.exact {
                SearchMode::Exact
            } else {
                SearchMode::Approximate
            },
            queries: args.queries,
            perturbation: args.perturbation,
            concurrency: args.concurrency,
            report: args.report,
        }
    }
}
