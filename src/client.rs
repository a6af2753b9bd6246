//! HTTP client for the ledger query backend
//!
//! Talks to the external explorer backend, which serves ledger queries at
//! `/byblocknum/{n}`, `/bytxid/{id}` and `/bykey/{key}` and wraps every
//! answer in the `{ error, msg }` envelope. Failures are surfaced once and
//! never retried.

use crate::error::{ExplorerError, Result};
use crate::models::{Block, QueryResponse};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ExplorerClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ExplorerClient {
    /// Create a client for the backend at `endpoint`, e.g.
    /// `http://localhost:5252`.
    pub fn new(endpoint: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(ExplorerClient {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn by_blocknum(&self, blocknum: u64) -> Result<Vec<Block>> {
        self.query(&format!("byblocknum/{}", blocknum)).await
    }

    pub async fn by_txid(&self, txid: &str) -> Result<Vec<Block>> {
        self.query(&format!("bytxid/{}", txid)).await
    }

    pub async fn by_key(&self, key: &str) -> Result<Vec<Block>> {
        self.query(&format!("bykey/{}", key)).await
    }

    async fn query(&self, path: &str) -> Result<Vec<Block>> {
        let url = format!("{}/{}", self.endpoint, path);
        debug!(%url, "querying backend");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let envelope: QueryResponse = response.json().await?;

        if !status.is_success() {
            return Err(ExplorerError::BackendError {
                status: status.as_u16(),
                message: if envelope.error.is_empty() {
                    status.to_string()
                } else {
                    envelope.error
                },
            });
        }

        match envelope.msg {
            Some(payload) => Ok(payload.into_vec()),
            None => Err(ExplorerError::BackendError {
                status: status.as_u16(),
                message: if envelope.error.is_empty() {
                    "empty response".to_string()
                } else {
                    envelope.error
                },
            }),
        }
    }
}
