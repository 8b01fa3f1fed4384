use tempfile::tempdir;
use vecoracle::{Corpus, SearchMode, VectorRecord};
use vecoracle_cli::commands::{generate, load, run, validate};
use vecoracle_cli::config::HarnessConfig;
use vecoracle_cli::engine::{QueryError, ValidationEngine};
use vecoracle_client::mock_server::{MockOptions, MockService, TxnStatus};
use vecoracle_client::VectorDbClient;
use vecoracle_dataset::jsonl;

fn harness(mock: &MockService) -> HarnessConfig {
    HarnessConfig {
        host: mock.url(),
        count: 200,
        queries: 25,
        batch_size: 20,
        workers: 4,
        concurrency: 4,
        insecure: false,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_run_against_exact_service_passes() {
    let mock = MockService::start(MockOptions::default()).await.unwrap();
    let cfg = HarnessConfig {
        mode: SearchMode::Exact,
        ..harness(&mock)
    };

    let outcome = run::run(&cfg).await.unwrap();

    assert_eq!(outcome.summary.queries, 25);
    assert!(outcome.summary.all_passed(), "{:?}", outcome.summary);
    assert_eq!(outcome.summary.mean_recall, 1.0);
    assert_eq!(mock.committed("testdb").len(), 200);
    assert!(mock.has_index("testdb"));
    assert_eq!(mock.count_transactions(TxnStatus::Committed), 1);
}

#[tokio::test]
async fn test_missing_neighbor_fails_exact_mode() {
    let mock = MockService::start(MockOptions {
        drop_rank: Some(0),
        ..Default::default()
    })
    .await
    .unwrap();
    let cfg = HarnessConfig {
        mode: SearchMode::Exact,
        ..harness(&mock)
    };

    let outcome = run::run(&cfg).await.unwrap();

    assert_eq!(outcome.summary.passed, 0);
    assert_eq!(outcome.summary.errored, 0);
    for q in &outcome.outcomes {
        let report = q.result.as_ref().unwrap();
        assert_eq!(report.false_negatives.len(), 1);
        assert_eq!(report.false_positives.len(), 1);
        assert!((report.recall - 0.8).abs() < 1e-12);
    }
}

#[tokio::test]
async fn test_missing_neighbor_tolerated_in_approximate_mode() {
    let mock = MockService::start(MockOptions {
        drop_rank: Some(0),
        ..Default::default()
    })
    .await
    .unwrap();
    let cfg = HarnessConfig {
        mode: SearchMode::Approximate,
        min_recall: 0.75,
        ..harness(&mock)
    };

    let outcome = run::run(&cfg).await.unwrap();
    assert!(outcome.summary.all_passed(), "{:?}", outcome.summary);

    // Same service, stricter bar.
    let strict = HarnessConfig {
        min_recall: 0.9,
        ..cfg
    };
    let outcome = validate::run(&strict).await.unwrap();
    assert_eq!(outcome.summary.passed, 0);
}

#[tokio::test]
async fn test_score_drift_is_reported() {
    let mock = MockService::start(MockOptions {
        score_bias: 0.05,
        ..Default::default()
    })
    .await
    .unwrap();
    let cfg = HarnessConfig {
        tolerance: 1e-2,
        ..harness(&mock)
    };

    let outcome = run::run(&cfg).await.unwrap();

    assert_eq!(outcome.summary.passed, 0);
    for q in &outcome.outcomes {
        let report = q.result.as_ref().unwrap();
        assert_eq!(report.recall, 1.0);
        assert_eq!(report.score_mismatches.len(), cfg.k);
        assert!(report.score_mismatches.iter().all(|m| (m.delta - 0.05).abs() < 1e-9));
    }
}

#[tokio::test]
async fn test_wrong_dimension_dataset_uploads_nothing() {
    let mock = MockService::start(MockOptions::default()).await.unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("corpus.jsonl");
    generate::run(&path, 50, 3, 7).unwrap();

    let cfg = HarnessConfig {
        dataset: Some(path),
        dimension: 5,
        ..harness(&mock)
    };

    let err = load::run(&cfg).await.err().expect("dimension mismatch");
    assert!(format!("{:#}", err).contains("expected 5, found 3"), "{:#}", err);
    assert_eq!(mock.upsert_calls(), 0);
    assert!(!mock.has_collection("testdb"));
}

#[tokio::test]
async fn test_generated_dataset_round_trips_through_service() {
    let mock = MockService::start(MockOptions::default()).await.unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("corpus.fvecs");
    let generated = generate::run(&path, 120, 8, 11).unwrap();

    let cfg = HarnessConfig {
        dataset: Some(path),
        dimension: 8,
        mode: SearchMode::Exact,
        // fvecs stores f32; the service sees the same narrowed values.
        tolerance: 1e-6,
        ..harness(&mock)
    };

    let loaded = load::run(&cfg).await.unwrap();
    assert_eq!(loaded.corpus.len(), generated.len());
    assert_eq!(loaded.ingest.batches, 6);

    let outcome = validate::run(&cfg).await.unwrap();
    assert!(outcome.summary.all_passed(), "{:?}", outcome.summary);
}

#[tokio::test]
async fn test_parquet_dataset_round_trips_through_service() {
    let mock = MockService::start(MockOptions::default()).await.unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("corpus.parquet");
    let generated = generate::run(&path, 90, 6, 5).unwrap();

    let cfg = HarnessConfig {
        dataset: Some(path),
        dimension: 6,
        mode: SearchMode::Exact,
        tolerance: 1e-12,
        ..harness(&mock)
    };

    let loaded = load::run(&cfg).await.unwrap();
    assert_eq!(loaded.corpus.fingerprint(), generated.fingerprint());

    let outcome = validate::run(&cfg).await.unwrap();
    assert!(outcome.summary.all_passed(), "{:?}", outcome.summary);
}

#[tokio::test]
async fn test_read_back_catches_altered_vectors() {
    let mock = MockService::start(MockOptions {
        fetch_bias: 0.5,
        ..Default::default()
    })
    .await
    .unwrap();

    let err = load::run(&harness(&mock)).await.err().expect("read-back drift");
    assert!(format!("{:#}", err).contains("read back with drift"), "{:#}", err);

    let unchecked = HarnessConfig {
        readback: 0,
        collection: "unchecked".to_string(),
        ..harness(&mock)
    };
    assert!(load::run(&unchecked).await.is_ok());
}

#[test]
fn test_max_corpus_id_leaves_no_query_ids() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corpus.jsonl");
    jsonl::write_jsonl(
        &path,
        &[
            VectorRecord::new(0u64, vec![1.0, 0.0, 0.0, 0.0, 0.0]),
            VectorRecord::new(u64::MAX, vec![0.0, 1.0, 0.0, 0.0, 0.0]),
        ],
    )
    .unwrap();
    let cfg = HarnessConfig {
        dataset: Some(path),
        ..Default::default()
    };
    let corpus = Corpus::with_dimension(cfg.corpus_records().unwrap(), 5).unwrap();

    let err = validate::build_queries(&cfg, &corpus).unwrap_err();
    assert!(err.to_string().contains("leaves no room"), "{}", err);
}

#[tokio::test]
async fn test_validate_without_load_reports_service_errors() {
    let mock = MockService::start(MockOptions::default()).await.unwrap();
    let cfg = harness(&mock);

    let outcome = validate::run(&cfg).await.unwrap();

    assert_eq!(outcome.summary.errored, cfg.queries);
    assert!(outcome
        .outcomes
        .iter()
        .all(|o| matches!(o.result, Err(QueryError::Service(ref e)) if e.status() == Some(404))));
}

#[tokio::test]
async fn test_degenerate_query_fails_alone() {
    let mock = MockService::start(MockOptions::default()).await.unwrap();
    let cfg = HarnessConfig {
        mode: SearchMode::Exact,
        count: 40,
        ..harness(&mock)
    };
    let loaded = load::run(&cfg).await.unwrap();

    let client = VectorDbClient::new(&mock.url());
    let engine = ValidationEngine::new(client, "testdb", loaded.corpus, cfg.comparator(), 3).with_concurrency(2);
    let mut queries: Vec<VectorRecord> = engine.corpus().records()[..3].to_vec();
    queries.insert(1, VectorRecord::new(1000u64, vec![0.0; 5]));

    let outcomes = engine.validate_all(queries).await;

    assert_eq!(outcomes.len(), 4);
    assert_eq!(outcomes[1].query.0, 1000);
    assert!(matches!(outcomes[1].result, Err(QueryError::Oracle(_))));
    for i in [0, 2, 3] {
        assert!(outcomes[i].passed(), "query {} should pass", outcomes[i].query);
    }
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let mock = MockService::start(MockOptions {
        token: Some("s3cret".to_string()),
        ..Default::default()
    })
    .await
    .unwrap();

    let anonymous = harness(&mock);
    assert!(load::run(&anonymous).await.is_err());

    let cfg = HarnessConfig {
        token: Some("s3cret".to_string()),
        ..harness(&mock)
    };
    let outcome = run::run(&cfg).await.unwrap();
    assert!(outcome.summary.all_passed());
}

#[test]
fn test_same_seed_same_corpus() {
    let dir = tempdir().unwrap();
    let a = generate::run(&dir.path().join("a.jsonl"), 30, 5, 42).unwrap();
    let b = generate::run(&dir.path().join("b.jsonl"), 30, 5, 42).unwrap();
    let c = generate::run(&dir.path().join("c.jsonl"), 30, 5, 43).unwrap();

    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());

    let cfg = HarnessConfig {
        count: 30,
        ..Default::default()
    };
    let from_config = Corpus::with_dimension(cfg.corpus_records().unwrap(), 5).unwrap();
    assert_eq!(from_config.fingerprint(), a.fingerprint());
}

#[test]
fn test_unknown_output_extension_rejected() {
    let dir = tempdir().unwrap();
    assert!(generate::run(&dir.path().join("corpus.csv"), 10, 5, 1).is_err());
}
