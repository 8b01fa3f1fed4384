use crate::corpus::Corpus;
use crate::error::OracleError;
use crate::types::id::RecordId;
use crate::types::vector::VectorRecord;

fn sample() -> Vec<VectorRecord> {
    vec![
        VectorRecord::new(10, vec![1.0, 0.0]),
        VectorRecord::new(20, vec![0.0, 1.0]),
        VectorRecord::new(30, vec![0.5, 0.5]),
    ]
}

#[test]
fn test_corpus_infers_dimension() {
    let corpus = Corpus::new(sample()).unwrap();
    assert_eq!(corpus.len(), 3);
    assert_eq!(corpus.dimension(), 2);
    assert_eq!(corpus.position(RecordId(30)), Some(2));
    assert_eq!(corpus.get(RecordId(20)).unwrap().values, vec![0.0, 1.0]);
    assert!(corpus.get(RecordId(99)).is_none());
}

#[test]
fn test_empty_corpus() {
    let corpus = Corpus::new(Vec::new()).unwrap();
    assert!(corpus.is_empty());
    assert_eq!(corpus.dimension(), 0);
}

#[test]
fn test_duplicate_id_rejected() {
    let mut records = sample();
    records.push(VectorRecord::new(20, vec![0.3, 0.3]));
    assert_eq!(
        Corpus::new(records).unwrap_err(),
        OracleError::DuplicateId(RecordId(20))
    );
}

#[test]
fn test_wrong_dimension_rejected_with_id() {
    let mut records = sample();
    records.push(VectorRecord::new(40, vec![0.3, 0.3, 0.3]));
    let err = Corpus::new(records).unwrap_err();
    assert_eq!(err.record_id(), Some(RecordId(40)));
    assert_eq!(
        err.root(),
        &OracleError::DimensionMismatch { expected: 2, found: 3 }
    );
}

#[test]
fn test_configured_dimension_enforced() {
    // No silent truncation to a prefix of the values.
    let err = Corpus::with_dimension(sample(), 5).unwrap_err();
    assert_eq!(err.record_id(), Some(RecordId(10)));
}

#[test]
fn test_non_finite_rejected() {
    let records = vec![VectorRecord::new(1, vec![1.0, f64::NAN])];
    assert_eq!(
        Corpus::new(records).unwrap_err(),
        OracleError::NonFiniteValue { id: RecordId(1), index: 1 }
    );
}

#[test]
fn test_fingerprint_tracks_order() {
    let a = Corpus::new(sample()).unwrap();
    let b = Corpus::new(sample()).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());

    let mut reversed = sample();
    reversed.reverse();
    let c = Corpus::new(reversed).unwrap();
    assert_ne!(a.fingerprint(), c.fingerprint());
}
