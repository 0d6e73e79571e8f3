//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. All problems are collected,
//! not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("backend.origin '{origin}' is invalid: {reason}")]
    InvalidBackendOrigin { origin: String, reason: String },

    #[error("backend.mount_path '{0}' must start with '/'")]
    InvalidMountPath(String),

    #[error("timeouts.upstream_secs must be greater than zero")]
    ZeroUpstreamTimeout,

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Err(reason) = check_origin(&config.backend.origin) {
        errors.push(ValidationError::InvalidBackendOrigin {
            origin: config.backend.origin.clone(),
            reason,
        });
    }

    if !config.backend.mount_path.starts_with('/') {
        errors.push(ValidationError::InvalidMountPath(
            config.backend.mount_path.clone(),
        ));
    }

    if config.timeouts.upstream_secs == Some(0) {
        errors.push(ValidationError::ZeroUpstreamTimeout);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_origin(origin: &str) -> Result<(), String> {
    let url = Url::parse(origin).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err("must not contain a path, query or fragment".to_string());
    }
    Ok(())
}
