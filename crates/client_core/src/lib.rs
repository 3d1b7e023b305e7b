use std::{path::Path, time::Duration};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde_json::Value;
use shared::{
    domain::{DisplayResult, TableQuery, UploadRequest},
    error::InputError,
    protocol::{self, DEFAULT_MIME_TYPE, UPLOAD_FIELD},
};
use tracing::{debug, warn};
use url::Url;

/// The two calls the UI makes against the spreadsheet backend.
#[async_trait]
pub trait TableApi: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<DisplayResult>;
    async fn query_table(&self, query: &TableQuery) -> Result<DisplayResult>;
}

pub struct HttpTableApi {
    http: Client,
    server_url: Url,
}

impl HttpTableApi {
    pub fn new(server_url: Url) -> Self {
        Self {
            http: Client::new(),
            server_url,
        }
    }

    /// Without a timeout requests wait as long as the connection stays open.
    pub fn with_timeout(server_url: Url, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("failed to build http client for table api")?;
        Ok(Self { http, server_url })
    }
}

#[async_trait]
impl TableApi for HttpTableApi {
    async fn upload(&self, request: UploadRequest) -> Result<DisplayResult> {
        let url = protocol::upload_url(&self.server_url)?;
        let mime_type = request
            .mime_type
            .clone()
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
        let size = request.bytes.len();
        let part = Part::bytes(request.bytes)
            .file_name(request.filename.clone())
            .mime_str(&mime_type)
            .with_context(|| format!("invalid mime type '{mime_type}'"))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        debug!(%url, filename = %request.filename, size, "uploading file");
        let response = self.http.post(url.clone()).multipart(form).send().await?;
        decode_json_body(&url, response).await
    }

    async fn query_table(&self, query: &TableQuery) -> Result<DisplayResult> {
        let url = protocol::table_url(&self.server_url, query)?;
        debug!(%url, table = %query.table, "querying table");
        let response = self.http.get(url.clone()).send().await?;
        decode_json_body(&url, response).await
    }
}

/// Status codes are not inspected; any body that parses as JSON is shown.
async fn decode_json_body(url: &Url, response: Response) -> Result<DisplayResult> {
    let status = response.status();
    if !status.is_success() {
        warn!(%url, %status, "table api answered with non-success status");
    }
    let body = response
        .bytes()
        .await
        .with_context(|| format!("failed to read response body from {url}"))?;
    let value: Value = serde_json::from_slice(&body)
        .with_context(|| format!("response from {url} (status {status}) is not valid JSON"))?;
    Ok(DisplayResult(value))
}

/// Reads a picked file into an upload request. An empty file comes back as
/// an [`InputError`] inside the `anyhow::Error` so callers can tell it apart
/// from read failures.
pub async fn load_upload(path: &Path) -> Result<UploadRequest> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("'{}' does not name a file", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let mime_type = mime_guess::from_path(path).first_raw().map(str::to_string);
    Ok(UploadRequest::new(filename, bytes, mime_type)?)
}

pub fn input_error(err: &anyhow::Error) -> Option<&InputError> {
    err.downcast_ref::<InputError>()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
