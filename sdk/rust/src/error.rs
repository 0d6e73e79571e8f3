//! Errors returned by resource operations.

use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Failure of a single resource call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A URL could not be built from the configuration.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request never produced a response.
    #[error("{method} {url} failed")]
    Transport {
        method: Method,
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered outside the 2xx range.
    #[error("Request failed with status code {}", status.as_u16())]
    Status {
        method: Method,
        url: Url,
        status: StatusCode,
        data: Value,
    },

    /// The backend declared JSON but sent something else.
    #[error("Invalid JSON response from {url}")]
    Decode {
        url: Url,
        #[source]
        source: serde_json::Error,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    /// A request body could not be encoded.
    #[error("Failed to encode request body")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
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

    /// Short machine-readable code, following the conventions browser HTTP
    /// clients use for the same failures.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidUrl(_) => "ERR_INVALID_URL",
            ApiError::Transport { source, .. } => {
                if self.is_connection_refused() {
                    "ECONNREFUSED"
                } else if source.is_timeout() {
                    "ECONNABORTED"
                } else {
                    "ERR_NETWORK"
                }
            }
            ApiError::Status { status, .. } if status.is_client_error() => "ERR_BAD_REQUEST",
            ApiError::Status { .. } | ApiError::Decode { .. } => "ERR_BAD_RESPONSE",
            ApiError::Build(_) | ApiError::Encode(_) => "ERR_BAD_OPTION_VALUE",
        }
    }

    /// True when the backend refused the TCP connection.
    pub fn is_connection_refused(&self) -> bool {
        let ApiError::Transport { source, .. } = self else {
            return false;
        };
        let mut cause: Option<&(dyn std::error::Error + 'static)> = Some(source);
        while let Some(err) = cause {
            if let Some(io) = err.downcast_ref::<std::io::Error>() {
                if io.kind() == std::io::ErrorKind::ConnectionRefused {
                    return true;
                }
            }
            cause = err.source();
        }
        false
    }

    /// True when no response was received at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, ApiError::Transport { source, .. } if source.is_connect())
    }

    /// Status code of the backend response, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: u16) -> ApiError {
        ApiError::Status {
            method: Method::GET,
            url: Url::parse("http://backend.local/api/drivers").unwrap(),
            status: StatusCode::from_u16(status).unwrap(),
            data: Value::Null,
        }
    }

    #[test]
    fn status_codes_map_to_client_and_server_errors() {
        assert_eq!(status_error(404).code(), "ERR_BAD_REQUEST");
        assert_eq!(status_error(503).code(), "ERR_BAD_RESPONSE");
        assert_eq!(status_error(404).status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(
            status_error(404).to_string(),
            "Request failed with status code 404"
        );
    }

    #[test]
    fn message_lists_each_cause_once() {
        let source = serde_json::from_str::<Value>("{oops").unwrap_err();
        let cause = source.to_string();
        let err = ApiError::Encode(source);

        assert_eq!(err.to_string(), "Failed to encode request body");
        assert_eq!(err.message(), format!("Failed to encode request body: {}", cause));
        assert_eq!(err.message().matches(cause.as_str()).count(), 1);
    }

    #[test]
    fn non_transport_errors_are_not_refusals() {
        assert!(!status_error(500).is_connection_refused());
        assert!(!ApiError::InvalidUrl("x".into()).is_connect());
    }
}
