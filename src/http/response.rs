//! Response handling and transformation.
//!
//! # Responsibilities
//! - Decode the backend body according to its content type
//! - Map forwarding failures to the structured 500 response
//!
//! # Design Decisions
//! - The backend status code is relayed verbatim, including 4xx/5xx
//! - Text bodies are relayed as JSON strings, so every relayed body is JSON

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Label carried in every failure body.
pub const PROXY_ERROR_LABEL: &str = "Proxy request failed";

/// Anything that prevents a backend response from being relayed.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid target URL '{url}'")]
    InvalidTarget {
        url: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },

    #[error("failed to build upstream request")]
    Build(#[from] axum::http::Error),

    #[error("failed to read request body")]
    ReadRequest(#[source] axum::Error),

    #[error("request body is not valid JSON")]
    RequestBody(#[source] serde_json::Error),

    #[error("upstream request failed")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream did not respond within {0} seconds")]
    Timeout(u64),

    #[error("failed to read upstream response")]
    ReadResponse(#[source] axum::Error),

    #[error("upstream returned invalid JSON")]
    ResponseBody(#[source] serde_json::Error),
}

impl ForwardError {
    /// The error and its causes, outermost first, joined with `": "`.
    pub fn message(&self) -> String {
        let mut message = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        message
    }
}

/// Body of the 500 response.
#[derive(Debug, Serialize)]
pub struct ProxyErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let body = ProxyErrorBody {
            error: PROXY_ERROR_LABEL,
            message: self.message(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Decode a backend body: JSON when the content type says so, text otherwise.
/// An empty JSON body decodes to `null`.
pub fn decode_backend_body(content_type: Option<&str>, bytes: &[u8]) -> Result<Value, serde_json::Error> {
    let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));
    if !is_json {
        return Ok(Value::String(String::from_utf8_lossy(bytes).into_owned()));
    }
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
}

/// Relay a decoded backend body under the backend's status code.
pub fn relay(status: StatusCode, data: Value) -> Response {
    (status, Json(data)).into_response()
}
