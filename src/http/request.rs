//! Inbound request handling.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) for every inbound request
//! - Map the inbound path onto the backend origin
//! - Decide whether and how the inbound body is forwarded
//!
//! # Design Decisions
//! - Only the path below the mount point and the query string reach the
//!   backend; inbound headers do not
//! - GET and HEAD never carry a body upstream

use axum::http::{HeaderValue, Method, Request};
use serde_json::Value;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Issues a fresh UUID v4 per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID attached by the request ID layer, or `"unknown"`.
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Strip the mount point from an inbound path. Paths outside the mount are
/// returned unchanged.
pub fn strip_mount<'a>(path: &'a str, mount_path: &str) -> &'a str {
    if mount_path.is_empty() {
        return path;
    }
    match path.strip_prefix(mount_path) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}

/// Non-empty path segments, in order.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// `<origin>/<segments joined by '/'>`, plus the query string when present.
pub fn target_url(origin: &str, segments: &[&str], query: Option<&str>) -> String {
    let mut url = format!("{}/{}", origin.trim_end_matches('/'), segments.join("/"));
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// Whether the outbound request may carry a body.
pub fn carries_body(method: &Method) -> bool {
    method != Method::GET && method != Method::HEAD
}

/// JSON-encode an inbound body for the backend.
///
/// An empty body is not forwarded. A JSON body is re-serialized; any other
/// content type is forwarded as a JSON string. Without a content type the body
/// is treated as JSON when it parses and as text otherwise.
pub fn encode_body(content_type: Option<&str>, bytes: &[u8]) -> Result<Option<Vec<u8>>, serde_json::Error> {
    if bytes.is_empty() {
        return Ok(None);
    }
    let text = || Value::String(String::from_utf8_lossy(bytes).into_owned());
    let value = match content_type {
        Some(ct) if ct.contains("application/json") => serde_json::from_slice(bytes)?,
        Some(_) => text(),
        None => serde_json::from_slice(bytes).unwrap_or_else(|_| text()),
    };
    serde_json::to_vec(&value).map(Some)
}
