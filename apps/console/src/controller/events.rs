//! Events flowing from action handlers to the view, and UI error modeling.

use shared::{
    domain::{RenderRegion, TableName},
    error::InputError,
};

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Replace the whole text of a render region.
    Render { region: RenderRegion, text: String },
    /// A link put its table name into the query input field.
    QueryInputChanged(String),
    /// The backend now knows this table; it shows up as a link after reload.
    TableDiscovered(TableName),
    Error(UiError),
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    /// Bad or missing input; shown as an alert, nothing was sent.
    Input,
    /// Network, file read or response parsing failure.
    Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    Upload,
    Query,
    Dispatch,
}

impl UiErrorContext {
    /// Region a request failure in this context is written into.
    pub fn region(self) -> Option<RenderRegion> {
        match self {
            UiErrorContext::Upload => Some(RenderRegion::UploadResult),
            UiErrorContext::Query => Some(RenderRegion::ApiResult),
            UiErrorContext::Dispatch => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn input(context: UiErrorContext, err: &InputError) -> Self {
        Self::alert(context, err.to_string())
    }

    pub fn alert(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Input,
            context,
            message: message.into(),
        }
    }

    pub fn request(context: UiErrorContext, err: &anyhow::Error) -> Self {
        Self {
            category: UiErrorCategory::Request,
            context,
            message: format!("{err:#}"),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    /// Text shown for a request failure; network and parse errors look alike.
    pub fn display_text(&self) -> String {
        match self.category {
            UiErrorCategory::Input => self.message.clone(),
            UiErrorCategory::Request => format!("Error: {}", self.message),
        }
    }
}
