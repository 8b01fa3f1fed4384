// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

const DEFAULT_FILTER: &str = "vecoracle=info,vecoracle_cli=info,vecoracle_client=info,vecoracle_dataset=info";

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    let handle = PrometheusBuilder::new().install_recorder()?;
    if PROM_HANDLE.set(handle).is_err() {
        tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
    }

    metrics::describe_counter!("vecoracle_batches_upserted_total", "Upsert batches accepted by the service");
    metrics::describe_counter!("vecoracle_batch_failures_total", "Upsert batches rejected or failed in transit");
    metrics::describe_counter!("vecoracle_transactions_aborted_total", "Transactions aborted after a failure");
    metrics::describe_counter!("vecoracle_queries_validated_total", "Queries compared against the oracle");
    metrics::describe_counter!("vecoracle_query_failures_total", "Queries that errored or failed comparison");
    metrics::describe_histogram!("vecoracle_query_recall", "Recall@k of the service answer per query");
    metrics::describe_gauge!("vecoracle_corpus_vectors", "Vectors in the oracle corpus");

    Ok(())
}

/// Prometheus text exposition of everything recorded so far.
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}
