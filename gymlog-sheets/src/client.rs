//! HTTP client for the sheet proxy.
//!
//! Implements [`RemoteLogStore`] over the proxy's JSON API. Every request
//! carries the configured HTTP timeout; the sync engine applies its own
//! bound on top.

use crate::config::SheetsConfig;
use crate::wire::{DataResponse, DeleteBody, RowBody};
use async_trait::async_trait;
use gymlog_model::{RawRow, RemoteId};
use gymlog_sync::{RemoteLogStore, Snapshot, StoreError, StoreResult};
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::debug;

/// Store backed by the sheet proxy.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: Client,
    config: SheetsConfig,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| StoreError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base_url.trim_end_matches('/'))
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> StoreResult<()> {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        check_status(resp).await?;
        Ok(())
    }

    fn request_error(&self, e: reqwest::Error) -> StoreError {
        if e.is_timeout() {
            StoreError::Timeout(self.config.request_timeout())
        } else if e.is_decode() {
            StoreError::InvalidResponse(e.to_string())
        } else {
            StoreError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl RemoteLogStore for SheetsClient {
    async fn list_all(&self) -> StoreResult<Snapshot> {
        let resp = self
            .client
            .get(self.url("/api/data"))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let data: DataResponse = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| self.request_error(e))?;

        debug!("fetched {} log rows", data.logs.len());
        data.into_snapshot()
    }

    async fn append(&self, row: &RawRow) -> StoreResult<()> {
        debug!("appending row for {}", row.exercise);
        self.post("/api/save", &RowBody::append(row)).await
    }

    async fn update(&self, id: RemoteId, row: &RawRow) -> StoreResult<()> {
        debug!("updating row {id}");
        self.post("/api/update", &RowBody::update(id, row)).await
    }

    async fn delete(&self, id: RemoteId) -> StoreResult<()> {
        debug!("deleting row {id}");
        self.post("/api/delete", &DeleteBody::new(id)).await
    }
}

/// Turns a non-2xx response into [`StoreError::Status`] carrying its body.
async fn check_status(resp: Response) -> StoreResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        message,
    })
}
