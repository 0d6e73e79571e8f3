//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_BACKEND_ORIGIN: &str = "AUTOMETER_BACKEND_ORIGIN";
pub const ENV_BIND_ADDRESS: &str = "AUTOMETER_BIND_ADDRESS";
pub const ENV_LOG_LEVEL: &str = "AUTOMETER_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, then apply environment overrides.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;
    finalize(config, |key| std::env::var(key).ok())
}

/// Defaults plus environment overrides, for running without a config file.
pub fn load_from_env() -> Result<GatewayConfig, ConfigError> {
    finalize(GatewayConfig::default(), |key| std::env::var(key).ok())
}

fn finalize<F>(mut config: GatewayConfig, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_overrides(&mut config, lookup);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `AUTOMETER_*` overrides. Empty values are ignored.
pub fn apply_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(origin) = get(ENV_BACKEND_ORIGIN) {
        config.backend.origin = origin;
    }
    if let Some(addr) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = GatewayConfig::default();
        apply_overrides(
            &mut config,
            env(&[
                (ENV_BACKEND_ORIGIN, "http://backend.internal:8080"),
                (ENV_LOG_LEVEL, "debug"),
                (ENV_BIND_ADDRESS, "  "),
            ]),
        );
        assert_eq!(config.backend.origin, "http://backend.internal:8080");
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn invalid_override_fails_validation() {
        let err = finalize(
            GatewayConfig::default(),
            env(&[(ENV_BACKEND_ORIGIN, "not-a-url")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().starts_with("Validation failed: backend.origin"));
    }

    #[test]
    fn loads_toml_file() {
        let path = std::env::temp_dir().join(format!("autometer-gateway-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[listener]\nbind_address = \"127.0.0.1:4000\"\n\n[backend]\norigin = \"http://10.0.0.5:8080\"\nmount_path = \"/proxy\""
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
        assert_eq!(config.backend.mount_path, "/proxy");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/autometer.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
