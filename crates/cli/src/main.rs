// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vecoracle_cli::commands::{generate, load, run, validate};
use vecoracle_cli::config::{HarnessArgs, HarnessConfig, DEFAULT_DIMENSION, DEFAULT_SEED};
use vecoracle_cli::telemetry;

#[derive(Parser)]
#[command(name = "vecoracle")]
#[command(about = "Checks a vector database's kNN answers against an exact cosine oracle", long_about = None)]
struct Cli {
    /// Print Prometheus metrics on exit
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a seeded synthetic corpus to a .fvecs, .jsonl or .parquet file
    Generate {
        output: PathBuf,

        #[arg(long, default_value_t = 2000)]
        count: usize,

        #[arg(long, default_value_t = DEFAULT_DIMENSION)]
        dimension: usize,

        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Create the collection and upload the corpus in one transaction
    Load(HarnessArgs),
    /// Query the service and compare every answer with the oracle
    Validate(HarnessArgs),
    /// Load, then validate
    Run(HarnessArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_telemetry()?;

    let result = match cli.command {
        Commands::Generate {
            output,
            count,
            dimension,
            seed,
        } => generate::run(&output, count, dimension, seed).map(|_| ()),
        Commands::Load(args) => {
            let cfg = HarnessConfig::from(args);
            load::run(&cfg).await.map(|outcome| {
                println!(
                    "Loaded {} vectors into {} ({} batches, {:?}), transaction {}",
                    outcome.ingest.vectors,
                    cfg.collection,
                    outcome.ingest.batches,
                    outcome.ingest.elapsed,
                    outcome.ingest.transaction_id
                );
            })
        }
        Commands::Validate(args) => {
            let cfg = HarnessConfig::from(args);
            validate::run(&cfg).await.and_then(|v| ensure_passed(&v))
        }
        Commands::Run(args) => {
            let cfg = HarnessConfig::from(args);
            run::run(&cfg).await.and_then(|v| ensure_passed(&v))
        }
    };

    if cli.metrics {
        println!("{}", telemetry::get_metrics());
    }
    result
}

fn ensure_passed(run: &validate::ValidationRun) -> anyhow::Result<()> {
    if !run.summary.all_passed() {
        anyhow::bail!(
            "{} of {} queries failed validation",
            run.summary.failed,
            run.summary.queries
        );
    }
    Ok(())
}
