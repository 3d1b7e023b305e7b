//! The three UI actions: submit an upload, query a table, activate a link.

use std::{path::Path, sync::Arc, time::Duration};

use client_core::{input_error, load_upload, TableApi};
use shared::{
    domain::{QueryOptions, RenderRegion, TableLink, TableName, TableQuery, UploadRequest},
    error::InputError,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_millis(800);
pub const UPLOADING_TEXT: &str = "Uploading...";
pub const LOADING_TEXT: &str = "Loading...";

/// Handlers never touch view state; everything they change goes out as a
/// [`UiEvent`]. Overlapping actions are not serialized, so the last response
/// to arrive owns the region.
pub struct Controller {
    api: Arc<dyn TableApi>,
    ui_tx: UnboundedSender<UiEvent>,
    reload_delay: Duration,
}

impl Controller {
    pub fn new(api: Arc<dyn TableApi>, ui_tx: UnboundedSender<UiEvent>) -> Self {
        Self {
            api,
            ui_tx,
            reload_delay: DEFAULT_RELOAD_DELAY,
        }
    }

    pub fn with_reload_delay(mut self, reload_delay: Duration) -> Self {
        self.reload_delay = reload_delay;
        self
    }

    /// `path` is the picked file, `None` when nothing was picked.
    pub async fn submit_upload(&self, path: Option<&Path>) {
        let Some(path) = path.filter(|path| !path.as_os_str().is_empty()) else {
            self.alert(UiErrorContext::Upload, &InputError::MissingFile);
            return;
        };

        match load_upload(path).await {
            Ok(request) => self.submit_request(request).await,
            Err(err) => match input_error(&err) {
                Some(input) => self.alert(UiErrorContext::Upload, input),
                None => self.fail(UiErrorContext::Upload, &err),
            },
        }
    }

    pub async fn submit_request(&self, request: UploadRequest) {
        debug!(filename = %request.filename, "dispatching upload");
        let table = TableName::from_upload_filename(&request.filename);
        self.render(RenderRegion::UploadResult, UPLOADING_TEXT);

        match self.api.upload(request).await {
            Ok(result) => {
                self.render(RenderRegion::UploadResult, result.render());
                if let Some(table) = table {
                    self.emit(UiEvent::TableDiscovered(table));
                }
                self.schedule_reload();
            }
            Err(err) => self.fail(UiErrorContext::Upload, &err),
        }
    }

    pub async fn query_table(&self, raw_name: &str, options: QueryOptions) {
        let table = match TableName::parse(raw_name) {
            Ok(table) => table,
            Err(err) => {
                self.alert(UiErrorContext::Query, &err);
                return;
            }
        };
        debug!(%table, "dispatching table query");
        self.render(RenderRegion::ApiResult, LOADING_TEXT);

        let query = TableQuery::new(table).with_options(options);
        match self.api.query_table(&query).await {
            Ok(result) => self.render(RenderRegion::ApiResult, result.render()),
            Err(err) => self.fail(UiErrorContext::Query, &err),
        }
    }

    /// Same as typing the link's table into the query field and pressing get.
    pub async fn activate_link(&self, link: &TableLink, options: QueryOptions) {
        let name = link.table.as_str().to_string();
        self.emit(UiEvent::QueryInputChanged(name.clone()));
        self.query_table(&name, options).await;
    }

    fn schedule_reload(&self) {
        let ui_tx = self.ui_tx.clone();
        let delay = self.reload_delay;
        debug!(delay_ms = delay.as_millis() as u64, "scheduling reload");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = ui_tx.send(UiEvent::Reload);
        });
    }

    fn render(&self, region: RenderRegion, text: impl Into<String>) {
        self.emit(UiEvent::Render {
            region,
            text: text.into(),
        });
    }

    fn alert(&self, context: UiErrorContext, err: &InputError) {
        self.emit(UiEvent::Error(UiError::input(context, err)));
    }

    fn fail(&self, context: UiErrorContext, err: &anyhow::Error) {
        warn!(?context, "request failed: {err:#}");
        self.emit(UiEvent::Error(UiError::request(context, err)));
    }

    fn emit(&self, event: UiEvent) {
        let _ = self.ui_tx.send(event);
    }
}

#[cfg(test)]
#[path = "tests/handlers_tests.rs"]
mod tests;
