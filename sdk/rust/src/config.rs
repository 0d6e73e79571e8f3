//! Client configuration and base URL selection.

use std::time::Duration;

use url::Url;

use crate::error::ApiError;

/// Path prefix the backend API lives under.
pub const API_PREFIX: &str = "/api";

/// Default request timeout for every call made by the client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Deployment context the client runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Talk to the backend directly.
    Development,
    /// Talk to the backend through the gateway mounted at `/api`.
    Production,
}

impl Environment {
    /// Environment implied by the build profile: debug builds are development.
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "DEVELOPMENT",
            Environment::Production => "PRODUCTION",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "prod" | "production" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Settings for [`crate::ApiClient`]. Built once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: Environment,

    /// Origin of the backend REST service (e.g. `http://localhost:8080`).
    pub backend_origin: String,

    /// Origin serving the gateway. Production base URLs are resolved against it.
    pub site_origin: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(environment: Environment, backend_origin: impl Into<String>) -> Self {
        Self {
            environment,
            backend_origin: backend_origin.into(),
            site_origin: "http://localhost:3000".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_site_origin(mut self, site_origin: impl Into<String>) -> Self {
        self.site_origin = site_origin.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL as selected by the environment.
    ///
    /// Development goes straight to `<backend origin>/api`, everything else
    /// uses the relative `/api` path served by the gateway.
    pub fn api_base_url(&self) -> String {
        match self.environment {
            Environment::Development => {
                format!("{}{}", self.backend_origin.trim_end_matches('/'), API_PREFIX)
            }
            Environment::Production => API_PREFIX.to_string(),
        }
    }

    /// Absolute base URL requests are built from.
    pub fn resolve_base_url(&self) -> Result<Url, ApiError> {
        let base = self.api_base_url();
        let resolved = match self.environment {
            Environment::Development => Url::parse(&base),
            Environment::Production => Url::parse(&self.site_origin).and_then(|site| site.join(&base)),
        };
        resolved.map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_uses_direct_backend() {
        let config = ClientConfig::new(Environment::Development, "http://backend.local:8080/");
        assert_eq!(config.api_base_url(), "http://backend.local:8080/api");
        assert_eq!(
            config.resolve_base_url().unwrap().as_str(),
            "http://backend.local:8080/api"
        );
    }

    #[test]
    fn production_uses_relative_api_path() {
        let config = ClientConfig::new(Environment::Production, "http://backend.local:8080")
            .with_site_origin("https://fleet.example.com");
        assert_eq!(config.api_base_url(), "/api");
        assert_eq!(
            config.resolve_base_url().unwrap().as_str(),
            "https://fleet.example.com/api"
        );
    }

    #[test]
    fn environment_parsing() {
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Development));
        assert_eq!("Production".parse::<Environment>(), Ok(Environment::Production));
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn default_timeout_is_thirty_seconds() {
        let config = ClientConfig::new(Environment::Production, "http://backend.local:8080");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn bad_site_origin_is_rejected() {
        let config = ClientConfig::new(Environment::Production, "http://backend.local:8080")
            .with_site_origin("not a url");
        assert!(matches!(config.resolve_base_url(), Err(ApiError::InvalidUrl(_))));
    }
}
