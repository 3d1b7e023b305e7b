//! Endpoint layout of the spreadsheet backend.

use url::Url;

use crate::{domain::TableQuery, error::ProtocolError};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const UPLOAD_SEGMENT: &str = "upload";
pub const UPLOAD_FIELD: &str = "file";
pub const TABLE_API_SEGMENT: &str = "api";
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Trims, drops trailing slashes and assumes `http://` when no scheme is
/// given, then checks that api paths can be appended.
pub fn parse_server_url(raw: &str) -> Result<Url, ProtocolError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let candidate = if trimmed.is_empty() {
        DEFAULT_SERVER_URL.to_string()
    } else if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let url = Url::parse(&candidate).map_err(|e| ProtocolError::InvalidServerUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ProtocolError::CannotBeABase(raw.to_string()));
    }
    Ok(url)
}

pub fn upload_url(base: &Url) -> Result<Url, ProtocolError> {
    with_segments(base, &[UPLOAD_SEGMENT])
}

/// `{base}/api/{table}` with the table pushed as one percent-encoded path
/// segment, so `a/b` becomes `a%2Fb`. Options become the query string.
/// `.` and `..` are refused: URL parsing collapses them even when escaped.
pub fn table_url(base: &Url, query: &TableQuery) -> Result<Url, ProtocolError> {
    if matches!(query.table.as_str(), "." | "..") {
        return Err(ProtocolError::DotSegmentTable(
            query.table.as_str().to_string(),
        ));
    }
    let mut url = with_segments(base, &[TABLE_API_SEGMENT, query.table.as_str()])?;
    let pairs = query.options.query_pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(url)
}

fn with_segments(base: &Url, segments: &[&str]) -> Result<Url, ProtocolError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| ProtocolError::CannotBeABase(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
