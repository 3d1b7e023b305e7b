use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InputError;

/// Opaque identifier of a backend table. Always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InputError::EmptyTableName);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Key the backend registers an uploaded workbook under: the file name
    /// lowercased, spaces replaced by `-` and every `.xlsx` removed.
    pub fn from_upload_filename(filename: &str) -> Option<Self> {
        let key = filename.to_lowercase().replace(' ', "-").replace(".xlsx", "");
        Self::parse(&key).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TableName {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TableName> for String {
    fn from(value: TableName) -> Self {
        value.0
    }
}

/// A picked file, read into memory for a single submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

impl UploadRequest {
    pub fn new(
        filename: impl Into<String>,
        bytes: Vec<u8>,
        mime_type: Option<String>,
    ) -> Result<Self, InputError> {
        let filename = filename.into();
        if bytes.is_empty() {
            return Err(InputError::EmptyFile { filename });
        }
        Ok(Self {
            filename,
            bytes,
            mime_type,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub column: String,
    pub value: String,
}

impl FromStr for ColumnFilter {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, value) = s
            .split_once('=')
            .ok_or_else(|| InputError::InvalidFilter(s.to_string()))?;
        let column = column.trim();
        if column.is_empty() {
            return Err(InputError::InvalidFilter(s.to_string()));
        }
        Ok(Self {
            column: column.to_string(),
            value: value.trim().to_string(),
        })
    }
}

/// Optional narrowing sent along with a table lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub filter: Option<ColumnFilter>,
}

impl QueryOptions {
    pub fn parse_limit(raw: &str) -> Result<u32, InputError> {
        match raw.trim().parse::<u32>() {
            Ok(limit) if limit > 0 => Ok(limit),
            _ => Err(InputError::InvalidLimit(raw.to_string())),
        }
    }

    /// Query-string pairs in wire order. Empty search terms and filters with
    /// an empty value are left out.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = self.search.as_deref() {
            if !search.is_empty() {
                pairs.push(("search".to_string(), search.to_string()));
            }
        }
        if let Some(filter) = &self.filter {
            if !filter.value.is_empty() {
                pairs.push((filter.column.clone(), filter.value.clone()));
            }
        }
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub table: TableName,
    pub options: QueryOptions,
}

impl TableQuery {
    pub fn new(table: TableName) -> Self {
        Self {
            table,
            options: QueryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }
}

/// A generated "view rows" link; activating it looks up `table`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableLink {
    pub table: TableName,
}

impl TableLink {
    pub fn new(table: TableName) -> Self {
        Self { table }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderRegion {
    UploadResult,
    ApiResult,
}

impl RenderRegion {
    pub fn label(self) -> &'static str {
        match self {
            RenderRegion::UploadResult => "upload",
            RenderRegion::ApiResult => "api",
        }
    }
}

/// A JSON response body as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayResult(pub Value);

impl DisplayResult {
    /// Two-space indented JSON, the same layout as `JSON.stringify(v, null, 2)`.
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

impl From<Value> for DisplayResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
