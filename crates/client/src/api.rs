// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Wire types of the vector-database REST API.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, Result};
use vecoracle::{Neighbor, RecordId, VectorRecord};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DenseVectorOptions {
    pub enabled: bool,
    pub auto_create_index: bool,
    pub dimension: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SparseVectorOptions {
    pub enabled: bool,
    pub auto_create_index: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CollectionConfig {
    pub max_vectors: Option<u64>,
    pub replication_factor: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateCollectionRequest {
    pub name: String,
    pub description: Option<String>,
    pub dense_vector: DenseVectorOptions,
    pub sparse_vector: SparseVectorOptions,
    pub metadata_schema: Option<serde_json::Value>,
    pub config: CollectionConfig,
}

impl CreateCollectionRequest {
    /// Dense-only collection; the index is created explicitly afterwards.
    pub fn dense(name: &str, description: Option<String>, dimension: usize) -> Self {
        Self {
            name: name.to_string(),
            description,
            dense_vector: DenseVectorOptions {
                enabled: true,
                auto_create_index: false,
                dimension,
            },
            sparse_vector: SparseVectorOptions {
                enabled: false,
                auto_create_index: false,
            },
            metadata_schema: None,
            config: CollectionConfig::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HnswParams {
    pub num_layers: u8,
    pub max_cache_size: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateIndexRequest {
    pub collection_name: String,
    pub name: String,
    pub distance_metric_type: String,
    pub quantization: String,
    pub data_type: String,
    pub index_type: String,
    pub params: HnswParams,
}

impl CreateIndexRequest {
    /// Cosine HNSW index with u8 scalar quantization.
    pub fn hnsw_cosine(collection: &str) -> Self {
        Self {
            collection_name: collection.to_string(),
            name: collection.to_string(),
            distance_metric_type: "cosine".to_string(),
            quantization: "scalar".to_string(),
            data_type: "u8".to_string(),
            index_type: "hnsw".to_string(),
            params: HnswParams {
                num_layers: 5,
                max_cache_size: 1000,
            },
        }
    }
}

/// Transaction handle. Servers answer with either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(u64),
            Str(String),
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Num(n) => TransactionId(n.to_string()),
            Repr::Str(s) => TransactionId(s),
        })
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UpsertVector {
    pub id: RecordId,
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UpsertRequest {
    pub vectors: Vec<UpsertVector>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub vector_db_name: String,
    pub vector: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub vector_db_name: String,
    pub vector_id: RecordId,
}

/// A stored vector as the service returns it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub id: RecordId,
    pub values: Vec<f64>,
}

impl From<FetchResponse> for VectorRecord {
    fn from(resp: FetchResponse) -> Self {
        VectorRecord::new(resp.id, resp.values)
    }
}

/// Score tag attached to each neighbor by the service.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    CosineSimilarity(f64),
    CosineDistance(f64),
    EuclideanDistance(f64),
    HammingDistance(f64),
    DotProductDistance(f64),
}

impl MetricValue {
    /// Converts to a cosine similarity comparable with the oracle.
    pub fn as_similarity(&self) -> Result<f64> {
        match *self {
            MetricValue::CosineSimilarity(s) => Ok(s),
            MetricValue::CosineDistance(d) => Ok(1.0 - d),
            MetricValue::EuclideanDistance(_) => Err(ClientError::UnsupportedMetric("EuclideanDistance")),
            MetricValue::HammingDistance(_) => Err(ClientError::UnsupportedMetric("HammingDistance")),
            MetricValue::DotProductDistance(_) => Err(ClientError::UnsupportedMetric("DotProductDistance")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum KnnEntry {
    /// `[id, {"CosineSimilarity": 0.98}]`
    Tagged(RecordId, MetricValue),
    /// `{"id": 1, "score": 0.98}`
    Scored { id: RecordId, score: f64 },
}

impl KnnEntry {
    pub fn to_neighbor(&self) -> Result<Neighbor> {
        match self {
            KnnEntry::Tagged(id, metric) => Ok(Neighbor::new(*id, metric.as_similarity()?)),
            KnnEntry::Scored { id, score } => Ok(Neighbor::new(*id, *score)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct KnnBody {
    #[serde(default)]
    pub knn: Option<Vec<KnnEntry>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SearchResponse {
    #[serde(rename = "RespVectorKNN", default)]
    pub resp_vector_knn: Option<KnnBody>,
}

impl SearchResponse {
    pub fn from_neighbors(neighbors: &[Neighbor]) -> Self {
        let knn = neighbors
            .iter()
            .map(|n| KnnEntry::Tagged(n.id, MetricValue::CosineSimilarity(n.score)))
            .collect();
        Self {
            resp_vector_knn: Some(KnnBody { knn: Some(knn) }),
        }
    }

    /// Neighbors in service order. A missing envelope or `knn` is empty.
    pub fn into_neighbors(self) -> Result<Vec<Neighbor>> {
        self.resp_vector_knn
            .and_then(|body| body.knn)
            .unwrap_or_default()
            .iter()
            .map(KnnEntry::to_neighbor)
            .collect()
    }
}
