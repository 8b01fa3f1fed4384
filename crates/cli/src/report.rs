// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use chrono::{DateTime, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;
use std::path::Path;

use crate::engine::{QueryOutcome, ValidationSummary};
use vecoracle::{ComparisonReport, RecordId, SearchMode};

#[derive(Debug, Serialize)]
pub struct QueryEntry<'a> {
    pub query: RecordId,
    pub passed: bool,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<&'a ComparisonReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub collection: &'a str,
    pub corpus_size: usize,
    pub corpus_fingerprint: String,
    pub mode: SearchMode,
    pub k: usize,
    pub summary: &'a ValidationSummary,
    pub queries: Vec<QueryEntry<'a>>,
}

impl<'a> RunReport<'a> {
    pub fn new(
        collection: &'a str,
        corpus: &vecoracle::Corpus,
        mode: SearchMode,
        k: usize,
        summary: &'a ValidationSummary,
        outcomes: &'a [QueryOutcome],
    ) -> Self {
        let queries = outcomes
            .iter()
            .map(|o| QueryEntry {
                query: o.query,
                passed: o.passed(),
                elapsed_ms: o.elapsed.as_secs_f64() * 1000.0,
                report: o.result.as_ref().ok(),
                error: o.result.as_ref().err().map(|e| e.to_string()),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            collection,
            corpus_size: corpus.len(),
            corpus_fingerprint: corpus.fingerprint().to_hex().to_string(),
            mode,
            k,
            summary,
            queries,
        }
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write report to {:?}", path))?;
        tracing::info!("Wrote report to {:?}", path);
        Ok(())
    }
}

pub fn summary_table(summary: &ValidationSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    table.add_row(vec!["Queries".to_string(), summary.queries.to_string()]);
    table.add_row(vec!["Passed".to_string(), summary.passed.to_string()]);
    table.add_row(vec!["Failed".to_string(), summary.failed.to_string()]);
    table.add_row(vec!["Errored".to_string(), summary.errored.to_string()]);
    table.add_row(vec!["Mean recall".to_string(), format!("{:.4}", summary.mean_recall)]);
    table.add_row(vec!["Min recall".to_string(), format!("{:.4}", summary.min_recall)]);
    table.add_row(vec!["Max score delta".to_string(), format!("{:.2e}", summary.max_score_delta)]);
    table
}

/// One row per failing query; `None` when everything passed.
pub fn failure_table(outcomes: &[QueryOutcome], limit: usize) -> Option<Table> {
    let failures: Vec<&QueryOutcome> = outcomes.iter().filter(|o| !o.passed()).take(limit).collect();
    if failures.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Query", "Recall", "Missing", "Unexpected", "Score mismatches", "Error"]);

    for outcome in failures {
        let row = match &outcome.result {
            Ok(report) => vec![
                outcome.query.to_string(),
                format!("{:.3}", report.recall),
                join_ids(&report.false_negatives),
                join_ids(&report.false_positives),
                report
                    .score_mismatches
                    .iter()
                    .map(|m| format!("{} ({:+.2e})", m.id, m.service_score - m.oracle_score))
                    .collect::<Vec<_>>()
                    .join(", "),
                String::new(),
            ],
            Err(e) => vec![
                outcome.query.to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                e.to_string(),
            ],
        };
        table.add_row(row);
    }
    Some(table)
}

fn join_ids(ids: &[RecordId]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
}

pub fn print(summary: &ValidationSummary, outcomes: &[QueryOutcome]) {
    println!("\nValidation Summary");
    println!("------------------");
    println!("{}\n", summary_table(summary));

    if let Some(table) = failure_table(outcomes, 20) {
        println!("Failing Queries");
        println!("---------------");
        println!("{table}\n");
    }
}
