//! Request and response observers.
//!
//! Observers only see shared references, so they cannot change what is sent
//! or what the caller gets back. A failed call is returned to the caller after
//! every observer has seen it.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Request;

use crate::client::ApiResponse;
use crate::error::ApiError;

/// Runs before a request is sent.
pub trait RequestObserver: Send + Sync {
    fn on_request(&self, request: &Request);
}

/// Runs after a call completes, successfully or not.
pub trait ResponseObserver: Send + Sync {
    fn on_response(&self, response: &ApiResponse);

    fn on_error(&self, error: &ApiError);
}

/// Ordered observer lists attached to a client.
#[derive(Clone, Default)]
pub struct Observers {
    request: Vec<Arc<dyn RequestObserver>>,
    response: Vec<Arc<dyn ResponseObserver>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer set with [`LoggingObserver`] on both sides. `timeout` is the
    /// client's request timeout, reported with every failure.
    pub fn logging(timeout: Duration) -> Self {
        let logger = Arc::new(LoggingObserver::new(timeout));
        let mut observers = Self::new();
        observers.push_request(logger.clone());
        observers.push_response(logger);
        observers
    }

    pub fn push_request(&mut self, observer: Arc<dyn RequestObserver>) {
        self.request.push(observer);
    }

    pub fn push_response(&mut self, observer: Arc<dyn ResponseObserver>) {
        self.response.push(observer);
    }

    pub(crate) fn before_request(&self, request: &Request) {
        for observer in &self.request {
            observer.on_request(request);
        }
    }

    pub(crate) fn after_response(&self, outcome: &Result<ApiResponse, ApiError>) {
        for observer in &self.response {
            match outcome {
                Ok(response) => observer.on_response(response),
                Err(error) => observer.on_error(error),
            }
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("request", &self.request.len())
            .field("response", &self.response.len())
            .finish()
    }
}

/// Diagnostic logging through `tracing`.
#[derive(Debug, Clone, Copy)]
pub struct LoggingObserver {
    timeout: Duration,
}

impl LoggingObserver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl RequestObserver for LoggingObserver {
    fn on_request(&self, request: &Request) {
        tracing::info!(
            method = %request.method(),
            url = %request.url(),
            "Making request"
        );
    }
}

impl ResponseObserver for LoggingObserver {
    fn on_response(&self, response: &ApiResponse) {
        tracing::info!(
            status = response.status.as_u16(),
            url = %response.url,
            "API response"
        );
    }

    fn on_error(&self, error: &ApiError) {
        let (method, url) = match error {
            ApiError::Transport { method, url, .. } | ApiError::Status { method, url, .. } => {
                (Some(method.as_str()), Some(url.as_str()))
            }
            ApiError::Decode { url, .. } => (None, Some(url.as_str())),
            _ => (None, None),
        };
        let response = match error {
            ApiError::Status { status, data, .. } => Some(format!("{} {}", status.as_u16(), data)),
            _ => None,
        };

        tracing::error!(
            error = %error.message(),
            code = error.code(),
            method = method.unwrap_or("-"),
            url = url.unwrap_or("-"),
            timeout_ms = self.timeout.as_millis() as u64,
            response = response.as_deref().unwrap_or("-"),
            "API error"
        );

        if error.is_connection_refused() {
            tracing::error!("Connection refused - is the backend server running?");
        }
    }
}
