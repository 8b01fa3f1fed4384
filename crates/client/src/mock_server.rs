// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! In-process stand-in for the vector-database service.
//!
//! Implements the REST surface the client uses, with transactions that only
//! become searchable on commit. Search is exact cosine kNN, optionally
//! degraded (`drop_rank`, `score_bias`) to imitate an approximate index.
//! Used by integration tests across the workspace.

use axum::extract::{Path, Request as AxumRequest, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::{from_fn_with_state, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;

use crate::api::{
    CreateCollectionRequest, CreateIndexRequest, FetchRequest, FetchResponse, SearchRequest, SearchResponse, TransactionId,
    TransactionResponse, UpsertRequest,
};
use vecoracle::index::by_score_desc;
use vecoracle::{similarity, Neighbor, RecordId, VectorRecord};

#[derive(Debug, Clone, Default)]
pub struct MockOptions {
    /// Required bearer token, if any.
    pub token: Option<String>,
    /// Upserts containing this id fail with 500.
    pub fail_upsert_for_id: Option<RecordId>,
    /// Search omits the neighbor at this rank and backfills from below.
    pub drop_rank: Option<usize>,
    /// Added to every returned score.
    pub score_bias: f64,
    /// Added to every value returned by fetch.
    pub fetch_bias: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnStatus {
    Open,
    Committed,
    Aborted,
}

#[derive(Debug)]
struct Collection {
    dimension: usize,
    committed: Vec<VectorRecord>,
    has_index: bool,
}

#[derive(Debug)]
struct Transaction {
    collection: String,
    staged: Vec<VectorRecord>,
    status: TxnStatus,
}

#[derive(Debug, Default)]
struct MockState {
    options: MockOptions,
    collections: HashMap<String, Collection>,
    transactions: HashMap<String, Transaction>,
    next_txn: u64,
    upsert_calls: usize,
}

type SharedState = Arc<Mutex<MockState>>;

pub struct MockService {
    addr: SocketAddr,
    state: SharedState,
}

impl MockService {
    /// Binds `127.0.0.1:0` and serves in a background task.
    pub async fn start(options: MockOptions) -> std::io::Result<Self> {
        let token = options.token.clone();
        let state: SharedState = Arc::new(Mutex::new(MockState {
            options,
            ..Default::default()
        }));

        let app = build_router(state.clone(), token);
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Mock service stopped: {}", e);
            }
        });
        tracing::debug!("Mock service listening on {}", addr);

        Ok(Self { addr, state })
    }

    /// Host URL without the `/vectordb` prefix.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Searchable records of `collection`, in commit order.
    pub fn committed(&self, collection: &str) -> Vec<VectorRecord> {
        lock(&self.state)
            .collections
            .get(collection)
            .map(|c| c.committed.clone())
            .unwrap_or_default()
    }

    pub fn has_collection(&self, collection: &str) -> bool {
        lock(&self.state).collections.contains_key(collection)
    }

    pub fn has_index(&self, collection: &str) -> bool {
        lock(&self.state)
            .collections
            .get(collection)
            .map(|c| c.has_index)
            .unwrap_or(false)
    }

    pub fn transaction_status(&self, txn: &TransactionId) -> Option<TxnStatus> {
        lock(&self.state).transactions.get(&txn.0).map(|t| t.status)
    }

    pub fn count_transactions(&self, status: TxnStatus) -> usize {
        lock(&self.state)
            .transactions
            .values()
            .filter(|t| t.status == status)
            .count()
    }

    pub fn upsert_calls(&self) -> usize {
        lock(&self.state).upsert_calls
    }
}

fn lock(state: &SharedState) -> MutexGuard<'_, MockState> {
    // A panicking handler must not wedge the remaining tests.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn auth_guard(
    State(token): State<Arc<Option<String>>>,
    req: AxumRequest,
    next: Next,
) -> Result<Response, StatusCode> {
    if let Some(token_str) = &*token {
        let provided = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.strip_prefix("Bearer "));
        if provided != Some(token_str.as_str()) {
            return Err(StatusCode::UNAUTHORIZED);
        }
    }
    Ok(next.run(req).await)
}

fn build_router(state: SharedState, token: Option<String>) -> Router {
    let app = Router::new()
        .route("/vectordb/collections", post(create_collection))
        .route(
            "/vectordb/collections/:name",
            get(get_collection).delete(delete_collection),
        )
        .route("/vectordb/indexes", post(create_index))
        .route("/vectordb/collections/:name/transactions", post(create_transaction))
        .route("/vectordb/collections/:name/transactions/:txn/upsert", post(upsert))
        .route("/vectordb/collections/:name/transactions/:txn/commit", post(commit))
        .route("/vectordb/collections/:name/transactions/:txn/abort", post(abort))
        .route("/vectordb/search", post(search))
        .route("/vectordb/fetch", post(fetch))
        .with_state(state);

    app.layer(from_fn_with_state(Arc::new(token), auth_guard))
}

type HandlerResult<T> = Result<T, (StatusCode, String)>;

fn not_found(what: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{} not found", what))
}

async fn create_collection(
    State(state): State<SharedState>,
    Json(req): Json<CreateCollectionRequest>,
) -> HandlerResult<Json<serde_json::Value>> {
    let mut s = lock(&state);
    if s.collections.contains_key(&req.name) {
        return Err((StatusCode::CONFLICT, format!("collection {} exists", req.name)));
    }
    s.collections.insert(
        req.name.clone(),
        Collection {
            dimension: req.dense_vector.dimension,
            committed: Vec::new(),
            has_index: req.dense_vector.auto_create_index,
        },
    );
    Ok(Json(serde_json::json!({
        "id": req.name,
        "name": req.name,
        "description": req.description,
    })))
}

async fn get_collection(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> HandlerResult<Json<serde_json::Value>> {
    let s = lock(&state);
    let c = s.collections.get(&name).ok_or_else(|| not_found("collection"))?;
    Ok(Json(serde_json::json!({
        "name": name,
        "dimension": c.dimension,
        "vectors": c.committed.len(),
    })))
}

async fn delete_collection(State(state): State<SharedState>, Path(name): Path<String>) -> HandlerResult<StatusCode> {
    let mut s = lock(&state);
    s.collections.remove(&name).ok_or_else(|| not_found("collection"))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_index(
    State(state): State<SharedState>,
    Json(req): Json<CreateIndexRequest>,
) -> HandlerResult<Json<serde_json::Value>> {
    let mut s = lock(&state);
    let c = s
        .collections
        .get_mut(&req.collection_name)
        .ok_or_else(|| not_found("collection"))?;
    c.has_index = true;
    Ok(Json(serde_json::json!({ "collection_name": req.collection_name })))
}

async fn create_transaction(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> HandlerResult<Json<TransactionResponse>> {
    let mut s = lock(&state);
    if !s.collections.contains_key(&name) {
        return Err(not_found("collection"));
    }
    s.next_txn += 1;
    let id = s.next_txn.to_string();
    s.transactions.insert(
        id.clone(),
        Transaction {
            collection: name,
            staged: Vec::new(),
            status: TxnStatus::Open,
        },
    );
    Ok(Json(TransactionResponse {
        transaction_id: TransactionId(id),
    }))
}

fn open_transaction<'a>(s: &'a mut MockState, name: &str, txn: &str) -> HandlerResult<&'a mut Transaction> {
    let t = s.transactions.get_mut(txn).ok_or_else(|| not_found("transaction"))?;
    if t.collection != name {
        return Err(not_found("transaction"));
    }
    if t.status != TxnStatus::Open {
        return Err((StatusCode::CONFLICT, format!("transaction {} is {:?}", txn, t.status)));
    }
    Ok(t)
}

async fn upsert(
    State(state): State<SharedState>,
    Path((name, txn)): Path<(String, String)>,
    Json(req): Json<UpsertRequest>,
) -> HandlerResult<StatusCode> {
    let mut s = lock(&state);
    s.upsert_calls += 1;

    let dimension = s
        .collections
        .get(&name)
        .map(|c| c.dimension)
        .ok_or_else(|| not_found("collection"))?;
    let fail_id = s.options.fail_upsert_for_id;

    if let Some(bad) = req.vectors.iter().find(|v| v.values.len() != dimension) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("vector {} has dimension {}, expected {}", bad.id, bad.values.len(), dimension),
        ));
    }
    if let Some(fail_id) = fail_id {
        if req.vectors.iter().any(|v| v.id == fail_id) {
            return Err((StatusCode::INTERNAL_SERVER_ERROR, format!("injected failure for {}", fail_id)));
        }
    }

    let t = open_transaction(&mut s, &name, &txn)?;
    t.staged
        .extend(req.vectors.into_iter().map(|v| VectorRecord::new(v.id, v.values)));
    Ok(StatusCode::NO_CONTENT)
}

async fn commit(
    State(state): State<SharedState>,
    Path((name, txn)): Path<(String, String)>,
) -> HandlerResult<StatusCode> {
    let mut s = lock(&state);
    let t = open_transaction(&mut s, &name, &txn)?;
    t.status = TxnStatus::Committed;
    let staged = std::mem::take(&mut t.staged);

    let c = s.collections.get_mut(&name).ok_or_else(|| not_found("collection"))?;
    for record in staged {
        // Upsert semantics: a re-sent id replaces the old vector.
        match c.committed.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => c.committed.push(record),
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn abort(
    State(state): State<SharedState>,
    Path((name, txn)): Path<(String, String)>,
) -> HandlerResult<StatusCode> {
    let mut s = lock(&state);
    let t = open_transaction(&mut s, &name, &txn)?;
    t.status = TxnStatus::Aborted;
    t.staged.clear();
    Ok(StatusCode::NO_CONTENT)
}

async fn search(
    State(state): State<SharedState>,
    Json(req): Json<SearchRequest>,
) -> HandlerResult<Json<SearchResponse>> {
    let s = lock(&state);
    let c = s
        .collections
        .get(&req.vector_db_name)
        .ok_or_else(|| not_found("collection"))?;
    let k = req.k.unwrap_or(vecoracle::config::DEFAULT_K);

    let mut scored = Vec::with_capacity(c.committed.len());
    for record in &c.committed {
        let score = similarity(&req.vector, &record.values)
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        scored.push(Neighbor::new(record.id, score + s.options.score_bias));
    }
    scored.sort_by(by_score_desc);

    if let Some(rank) = s.options.drop_rank {
        if rank < scored.len() {
            scored.remove(rank);
        }
    }
    scored.truncate(k);

    Ok(Json(SearchResponse::from_neighbors(&scored)))
}

async fn fetch(
    State(state): State<SharedState>,
    Json(req): Json<FetchRequest>,
) -> HandlerResult<Json<FetchResponse>> {
    let s = lock(&state);
    let c = s
        .collections
        .get(&req.vector_db_name)
        .ok_or_else(|| not_found("collection"))?;
    let record = c
        .committed
        .iter()
        .find(|r| r.id == req.vector_id)
        .ok_or_else(|| not_found("vector"))?;
    let bias = s.options.fetch_bias;
    Ok(Json(FetchResponse {
        id: record.id,
        values: record.values.iter().map(|v| v + bias).collect(),
    }))
}
