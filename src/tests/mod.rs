pub mod corpus_tests;
pub mod index_tests;
pub mod property_tests;

/// Tolerance used when asserting `similarity(a, a) == 1.0`.
pub const SELF_SIMILARITY_EPSILON: f64 = 1e-9;
