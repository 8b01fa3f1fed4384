use crate::corpus::Corpus;
use crate::error::{Operand, OracleError};
use crate::index::brute_force::bruteforce_search;
use crate::index::is_ranked;
use crate::types::id::RecordId;
use crate::types::vector::VectorRecord;

fn three_point_corpus() -> Corpus {
    Corpus::new(vec![
        VectorRecord::new(1, vec![1.0, 0.0]),
        VectorRecord::new(2, vec![0.0, 1.0]),
        VectorRecord::new(3, vec![0.9, 0.1]),
    ])
    .unwrap()
}

#[test]
fn test_end_to_end_top2() {
    let corpus = three_point_corpus();
    let query = VectorRecord::new(99, vec![1.0, 0.0]);

    let results = bruteforce_search(&corpus, &query, 2).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, RecordId(1));
    assert!((results[0].score - 1.0).abs() < 1e-12);
    assert_eq!(results[1].id, RecordId(3));
    assert!((results[1].score - 0.994).abs() < 1e-3);
}

#[test]
fn test_k_larger_than_corpus() {
    let corpus = three_point_corpus();
    let query = VectorRecord::new(99, vec![0.0, 1.0]);

    let results = bruteforce_search(&corpus, &query, 10).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].id, RecordId(2));
    // Orthogonal record ranks last.
    assert_eq!(results[2].id, RecordId(1));
    assert!(is_ranked(&results));
}

#[test]
fn test_k_zero_and_empty_corpus() {
    let corpus = three_point_corpus();
    let query = VectorRecord::new(99, vec![1.0, 0.0]);
    assert!(bruteforce_search(&corpus, &query, 0).unwrap().is_empty());

    let empty = Corpus::new(Vec::new()).unwrap();
    assert!(bruteforce_search(&empty, &query, 5).unwrap().is_empty());
}

#[test]
fn test_tie_breaking_keeps_corpus_order() {
    // Same direction, different magnitudes: identical scores.
    let corpus = Corpus::new(vec![
        VectorRecord::new(7, vec![2.0, 2.0]),
        VectorRecord::new(3, vec![1.0, 1.0]),
        VectorRecord::new(5, vec![0.5, 0.5]),
        VectorRecord::new(1, vec![-1.0, 1.0]),
    ])
    .unwrap();
    let query = VectorRecord::new(0, vec![1.0, 1.0]);

    let results = bruteforce_search(&corpus, &query, 3).unwrap();
    let ids: Vec<u64> = results.iter().map(|n| n.id.0).collect();
    assert_eq!(ids, vec![7, 3, 5]);
}

#[test]
fn test_orthogonal_records_tie_at_zero() {
    let corpus = Corpus::new(vec![
        VectorRecord::new(1, vec![0.0, -1.0]),
        VectorRecord::new(2, vec![0.0, 1.0]),
    ])
    .unwrap();
    let query = VectorRecord::new(0, vec![1.0, 0.0]);

    let results = bruteforce_search(&corpus, &query, 2).unwrap();
    assert_eq!(results[0].id, RecordId(1));
    assert_eq!(results[1].id, RecordId(2));
}

#[test]
fn test_degenerate_query_reports_query_id() {
    let corpus = three_point_corpus();
    let query = VectorRecord::new(99, vec![0.0, 0.0]);

    let err = bruteforce_search(&corpus, &query, 2).unwrap_err();
    assert_eq!(err.record_id(), Some(RecordId(99)));
    assert_eq!(err.root(), &OracleError::DegenerateVector(Operand::Left));
    assert_eq!(err.to_string(), "Record 99: Degenerate vector: left operand has zero norm");
}

#[test]
fn test_degenerate_query_rejected_on_empty_corpus() {
    let corpus = Corpus::new(Vec::new()).unwrap();
    let query = VectorRecord::new(99, vec![0.0, 0.0]);

    let err = bruteforce_search(&corpus, &query, 2).unwrap_err();
    assert_eq!(err.record_id(), Some(RecordId(99)));
    assert_eq!(err.root(), &OracleError::DegenerateVector(Operand::Left));
}

#[test]
fn test_any_query_dimension_on_empty_corpus() {
    let corpus = Corpus::new(Vec::new()).unwrap();
    let query = VectorRecord::new(99, vec![1.0, 0.0, 0.0]);
    assert!(bruteforce_search(&corpus, &query, 2).unwrap().is_empty());
}

#[test]
fn test_degenerate_record_reports_its_id() {
    let corpus = Corpus::new(vec![
        VectorRecord::new(1, vec![1.0, 0.0]),
        VectorRecord::new(2, vec![0.0, 0.0]),
    ])
    .unwrap();
    let query = VectorRecord::new(99, vec![1.0, 0.0]);

    let err = bruteforce_search(&corpus, &query, 1).unwrap_err();
    assert_eq!(err.record_id(), Some(RecordId(2)));
    assert_eq!(err.root(), &OracleError::DegenerateVector(Operand::Right));
    assert_eq!(err.to_string(), "Record 2: Degenerate vector: right operand has zero norm");
}

#[test]
fn test_query_dimension_mismatch() {
    let corpus = three_point_corpus();
    let query = VectorRecord::new(99, vec![1.0, 0.0, 0.0]);

    let err = corpus.search(&query, 2).unwrap_err();
    assert_eq!(err.record_id(), Some(RecordId(99)));
    assert_eq!(
        err.root(),
        &OracleError::DimensionMismatch { expected: 2, found: 3 }
    );
}

#[test]
fn test_non_finite_query_rejected() {
    let corpus = three_point_corpus();
    let query = VectorRecord::new(99, vec![f64::INFINITY, 0.0]);
    assert_eq!(
        bruteforce_search(&corpus, &query, 2).unwrap_err(),
        OracleError::NonFiniteValue { id: RecordId(99), index: 0 }
    );
}
