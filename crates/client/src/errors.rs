// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("{action} failed: {status}: {body}")]
    Status {
        action: &'static str,
        status: u16,
        body: String,
    },
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Metric {0} is not comparable to cosine similarity")]
    UnsupportedMetric(&'static str),
    #[error("Upsert of batch {batch} failed: {source}")]
    Upsert {
        batch: usize,
        #[source]
        source: Box<ClientError>,
    },
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// HTTP status of a rejected request, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Upsert { source, .. } => source.status(),
            _ => None,
        }
    }
}
