//! Configuration loading from disk and command line.

use std::fs;
use std::path::Path;

use crate::config::schema::BalancerConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file. Validation happens separately,
/// after command-line overrides are applied.
pub fn load_config(path: &Path) -> Result<BalancerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: BalancerConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let raw = r#"
            backends = ["http://127.0.0.1:3000"]

            [listener]
            bind_address = "127.0.0.1:3030"

            [health_check]
            interval_secs = 30
        "#;
        let config: BalancerConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.backends.len(), 1);
        assert_eq!(config.listener.bind_address, "127.0.0.1:3030");
        assert_eq!(config.health_check.interval_secs, 30);
        // Untouched sections keep their defaults.
        assert_eq!(config.proxy.max_attempts, 5);
        assert_eq!(config.health_check.timeout_secs, 2);
    }
}
