// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Runs queries against the oracle and the live service side by side.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use vecoracle::{Comparator, ComparisonReport, Corpus, OracleError, RecordId, VectorRecord};
use vecoracle_client::{ClientError, VectorDbClient};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),
    #[error("Service error: {0}")]
    Service(#[from] ClientError),
    #[error("Oracle task failed: {0}")]
    Join(String),
}

/// One query's result. A failed query never aborts the batch.
#[derive(Debug)]
pub struct QueryOutcome {
    pub query: RecordId,
    pub elapsed: Duration,
    pub result: Result<ComparisonReport, QueryError>,
}

impl QueryOutcome {
    pub fn passed(&self) -> bool {
        matches!(&self.result, Ok(report) if report.passed())
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationSummary {
    pub queries: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub mean_recall: f64,
    pub min_recall: f64,
    pub max_score_delta: f64,
}

impl ValidationSummary {
    pub fn from_outcomes(outcomes: &[QueryOutcome]) -> Self {
        let reports: Vec<&ComparisonReport> = outcomes.iter().filter_map(|o| o.result.as_ref().ok()).collect();
        let passed = outcomes.iter().filter(|o| o.passed()).count();
        let errored = outcomes.len() - reports.len();

        let mean_recall = if reports.is_empty() {
            0.0
        } else {
            reports.iter().map(|r| r.recall).sum::<f64>() / reports.len() as f64
        };
        let min_recall = reports.iter().map(|r| r.recall).reduce(f64::min).unwrap_or(0.0);
        let max_score_delta = reports
            .iter()
            .filter_map(|r| r.max_delta())
            .reduce(f64::max)
            .unwrap_or(0.0);

        Self {
            queries: outcomes.len(),
            passed,
            failed: outcomes.len() - passed,
            errored,
            mean_recall,
            min_recall,
            max_score_delta,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

pub struct ValidationEngine {
    client: VectorDbClient,
    collection: String,
    corpus: Arc<Corpus>,
    comparator: Comparator,
    k: usize,
    concurrency: usize,
}

impl ValidationEngine {
    pub fn new(client: VectorDbClient, collection: impl Into<String>, corpus: Corpus, comparator: Comparator, k: usize) -> Self {
        Self {
            client,
            collection: collection.into(),
            corpus: Arc::new(corpus),
            comparator,
            k,
            concurrency: 1,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Oracle search runs on the blocking pool while the service request is in flight.
    pub async fn validate_one(&self, query: VectorRecord) -> QueryOutcome {
        let start = Instant::now();
        let id = query.id;

        let corpus = Arc::clone(&self.corpus);
        let k = self.k;
        let oracle_query = query.clone();
        let oracle = tokio::task::spawn_blocking(move || corpus.search(&oracle_query, k));
        let service = self.client.search(&self.collection, &query.values, Some(self.k));

        let (oracle, service) = tokio::join!(oracle, service);

        let result = match oracle {
            Err(e) => Err(QueryError::Join(e.to_string())),
            Ok(Err(e)) => Err(QueryError::Oracle(e)),
            Ok(Ok(expected)) => match service {
                Err(e) => Err(QueryError::Service(e)),
                Ok(actual) => self.comparator.compare(&expected, &actual).map_err(QueryError::from),
            },
        };

        record_metrics(&result);
        match &result {
            Ok(report) if report.passed() => {
                tracing::debug!("Query {} passed (recall {:.3})", id, report.recall);
            }
            Ok(report) => tracing::warn!(
                "Query {} failed: recall {:.3}, {} score mismatches, {} false positives, {} false negatives",
                id,
                report.recall,
                report.score_mismatches.len(),
                report.false_positives.len(),
                report.false_negatives.len()
            ),
            Err(e) => tracing::error!("Query {} errored: {}", id, e),
        }

        QueryOutcome {
            query: id,
            elapsed: start.elapsed(),
            result,
        }
    }

    /// Outcomes come back in query order.
    pub async fn validate_all(&self, queries: Vec<VectorRecord>) -> Vec<QueryOutcome> {
        tracing::info!(
            "Validating {} queries against {} (k={}, concurrency={})",
            queries.len(),
            self.collection,
            self.k,
            self.concurrency
        );
        stream::iter(queries)
            .map(|q| self.validate_one(q))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

fn record_metrics(result: &Result<ComparisonReport, QueryError>) {
    metrics::increment_counter!("vecoracle_queries_validated_total");
    match result {
        Ok(report) => {
            metrics::histogram!("vecoracle_query_recall", report.recall);
            if !report.passed() {
                metrics::increment_counter!("vecoracle_query_failures_total");
            }
        }
        Err(_) => metrics::increment_counter!("vecoracle_query_failures_total"),
    }
}
