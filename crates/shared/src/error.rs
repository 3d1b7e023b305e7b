use thiserror::Error;

/// Problems with what the user typed or picked. These are reported as alerts
/// and never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Choose a file first")]
    MissingFile,
    #[error("Choose a file first ('{filename}' is empty)")]
    EmptyFile { filename: String },
    #[error("Enter table name exactly as shown.")]
    EmptyTableName,
    #[error("limit must be a positive number, got '{0}'")]
    InvalidLimit(String),
    #[error("filter must look like COLUMN=VALUE, got '{0}'")]
    InvalidFilter(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },
    #[error("server url '{0}' cannot be used as a base for api paths")]
    CannotBeABase(String),
    #[error("table name '{0}' is a dot segment and cannot be used in an api path")]
    DotSegmentTable(String),
}
