//! Recording stand-in for the table api used by controller and session tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use client_core::TableApi;
use serde_json::json;
use shared::domain::{DisplayResult, TableQuery, UploadRequest};
use tokio::sync::{mpsc::UnboundedReceiver, Mutex};

use crate::controller::events::UiEvent;

#[derive(Default)]
pub struct RecordingTableApi {
    pub uploads: Mutex<Vec<UploadRequest>>,
    pub queries: Mutex<Vec<TableQuery>>,
    fail_with: Option<String>,
}

impl RecordingTableApi {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failing(err: impl Into<String>) -> Self {
        Self {
            fail_with: Some(err.into()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl TableApi for RecordingTableApi {
    async fn upload(&self, request: UploadRequest) -> Result<DisplayResult> {
        let filename = request.filename.clone();
        self.uploads.lock().await.push(request);
        if let Some(err) = &self.fail_with {
            return Err(anyhow!(err.clone()));
        }
        Ok(DisplayResult(json!({ "status": "saved", "file": filename })))
    }

    async fn query_table(&self, query: &TableQuery) -> Result<DisplayResult> {
        self.queries.lock().await.push(query.clone());
        if let Some(err) = &self.fail_with {
            return Err(anyhow!(err.clone()));
        }
        Ok(DisplayResult(json!([{ "table": query.table.as_str(), "id": 1 }])))
    }
}

/// Everything emitted so far, without waiting.
pub fn drain(rx: &mut UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
