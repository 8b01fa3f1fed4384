// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::api::{
    CreateCollectionRequest, CreateIndexRequest, FetchRequest, FetchResponse, SearchRequest, SearchResponse, TransactionId,
    TransactionResponse, UpsertRequest, UpsertVector,
};
use crate::errors::{ClientError, Result};
use vecoracle::{RankedList, RecordId, VectorRecord};

#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Sent as `Authorization: Bearer <token>`.
    pub token: Option<String>,
    /// Accept self-signed certificates on HTTPS hosts.
    pub accept_invalid_certs: bool,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct VectorDbClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl VectorDbClient {
    pub fn new(host: &str) -> Self {
        Self {
            base_url: Self::base_url_for(host),
            token: None,
            client: Client::new(),
        }
    }

    pub fn connect(host: &str, options: ClientOptions) -> Result<Self> {
        let mut builder = Client::builder().danger_accept_invalid_certs(options.accept_invalid_certs);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            base_url: Self::base_url_for(host),
            token: options.token,
            client,
        })
    }

    fn base_url_for(host: &str) -> String {
        format!("{}/vectordb", host.trim_end_matches('/'))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, action: &'static str, builder: RequestBuilder) -> Result<Response> {
        let resp = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!("{} returned {}: {}", action, status, body);
            return Err(ClientError::Status { action, status, body });
        }
        Ok(resp)
    }

    /// Parses the body, treating an empty body (204) as `T::default()`.
    async fn json_or_default<T: DeserializeOwned + Default>(resp: Response) -> Result<T> {
        let text = resp.text().await.map_err(|e| ClientError::Network(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn create_collection(&self, req: &CreateCollectionRequest) -> Result<serde_json::Value> {
        let resp = self
            .send("Create collection", self.request(Method::POST, "/collections").json(req))
            .await?;
        Self::json_or_default(resp).await
    }

    pub async fn get_collection(&self, name: &str) -> Result<serde_json::Value> {
        let path = format!("/collections/{}", name);
        let resp = self.send("Get collection", self.request(Method::GET, &path)).await?;
        Self::json_or_default(resp).await
    }

    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        let path = format!("/collections/{}", name);
        self.send("Delete collection", self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    pub async fn create_index(&self, req: &CreateIndexRequest) -> Result<serde_json::Value> {
        let resp = self
            .send("Create index", self.request(Method::POST, "/indexes").json(req))
            .await?;
        Self::json_or_default(resp).await
    }

    pub async fn create_transaction(&self, collection: &str) -> Result<TransactionId> {
        let path = format!("/collections/{}/transactions", collection);
        let resp = self
            .send("Create transaction", self.request(Method::POST, &path))
            .await?;
        let body: TransactionResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(body.transaction_id)
    }

    pub async fn upsert(&self, collection: &str, txn: &TransactionId, records: &[VectorRecord]) -> Result<()> {
        let path = format!("/collections/{}/transactions/{}/upsert", collection, txn);
        let body = UpsertRequest {
            vectors: records
                .iter()
                .map(|r| UpsertVector {
                    id: r.id,
                    values: r.values.clone(),
                    metadata: None,
                })
                .collect(),
        };
        self.send("Upsert", self.request(Method::POST, &path).json(&body)).await?;
        Ok(())
    }

    pub async fn commit(&self, collection: &str, txn: &TransactionId) -> Result<()> {
        let path = format!("/collections/{}/transactions/{}/commit", collection, txn);
        self.send("Commit transaction", self.request(Method::POST, &path)).await?;
        Ok(())
    }

    pub async fn abort(&self, collection: &str, txn: &TransactionId) -> Result<()> {
        let path = format!("/collections/{}/transactions/{}/abort", collection, txn);
        self.send("Abort transaction", self.request(Method::POST, &path)).await?;
        Ok(())
    }

    /// Reads back one committed vector.
    pub async fn fetch_vector(&self, collection: &str, id: RecordId) -> Result<VectorRecord> {
        let req = FetchRequest {
            vector_db_name: collection.to_string(),
            vector_id: id,
        };
        let resp = self
            .send("Fetch vector", self.request(Method::POST, "/fetch").json(&req))
            .await?;
        let body: FetchResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(body.into())
    }

    /// ANN search. Returns neighbors in the order the service ranked them.
    pub async fn search(&self, collection: &str, vector: &[f64], k: Option<usize>) -> Result<RankedList> {
        let req = SearchRequest {
            vector_db_name: collection.to_string(),
            vector: vector.to_vec(),
            k,
        };
        let resp = self
            .send("Search", self.request(Method::POST, "/search").json(&req))
            .await?;
        let body: SearchResponse = Self::json_or_default(resp).await?;
        body.into_neighbors()
    }
}
