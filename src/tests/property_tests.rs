use proptest::prelude::*;

use crate::tests::SELF_SIMILARITY_EPSILON;
use crate::corpus::Corpus;
use crate::error::OracleError;
use crate::index::brute_force::bruteforce_search;
use crate::index::is_ranked;
use crate::math::cosine::{norm, similarity};
use crate::types::vector::VectorRecord;

const DIM: usize = 4;

fn arb_nonzero(dim: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-100.0f64..100.0, dim).prop_filter("non-zero norm", |v| norm(v) > 1e-6)
}

fn arb_corpus() -> impl Strategy<Value = Corpus> {
    prop::collection::vec(arb_nonzero(DIM), 0..40).prop_map(|rows| {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, values)| VectorRecord::new(i as u64, values))
            .collect();
        Corpus::new(records).unwrap()
    })
}

proptest! {
    /// Result length is `min(k, |C|)` and scores never increase.
    #[test]
    fn prop_search_bounded_and_ranked(corpus in arb_corpus(), query in arb_nonzero(DIM), k in 0usize..60) {
        let query = VectorRecord::new(u64::MAX, query);
        let results = bruteforce_search(&corpus, &query, k).unwrap();
        prop_assert_eq!(results.len(), k.min(corpus.len()));
        prop_assert!(is_ranked(&results));
    }

    /// `similarity(a, a) == 1.0` within 1e-9.
    #[test]
    fn prop_self_similarity(a in arb_nonzero(DIM)) {
        let s = similarity(&a, &a).unwrap();
        prop_assert!((s - 1.0).abs() < SELF_SIMILARITY_EPSILON, "similarity(a, a) = {}", s);
    }

    /// Exact symmetry, bit for bit.
    #[test]
    fn prop_symmetry(a in arb_nonzero(DIM), b in arb_nonzero(DIM)) {
        prop_assert_eq!(
            similarity(&a, &b).unwrap().to_bits(),
            similarity(&b, &a).unwrap().to_bits()
        );
    }

    /// Lengths that differ always fail, whatever the values.
    #[test]
    fn prop_length_mismatch(a in arb_nonzero(3), b in arb_nonzero(5)) {
        prop_assert_eq!(
            similarity(&a, &b),
            Err(OracleError::DimensionMismatch { expected: 3, found: 5 })
        );
    }

    /// Every score the oracle returns is the similarity of that record.
    #[test]
    fn prop_scores_match_similarity(corpus in arb_corpus(), query in arb_nonzero(DIM)) {
        let query = VectorRecord::new(u64::MAX, query);
        for n in bruteforce_search(&corpus, &query, 10).unwrap() {
            let record = corpus.get(n.id).unwrap();
            prop_assert_eq!(n.score, similarity(&query.values, &record.values).unwrap());
        }
    }
}
