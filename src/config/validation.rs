//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check backend addresses parse as usable URLs
//! - Validate value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs before config is accepted into the system

use url::Url;

use crate::config::schema::BalancerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("no backends configured")]
    NoBackends,

    #[error("invalid backend address '{address}': {reason}")]
    InvalidBackend { address: String, reason: String },

    #[error("unsupported scheme '{scheme}' for backend '{address}' (only http)")]
    UnsupportedScheme { address: String, scheme: String },

    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },
}

/// Validate a configuration, returning the parsed backend URLs.
///
/// All errors are collected before returning so the operator sees every
/// problem at once.
pub fn validate_config(config: &BalancerConfig) -> Result<Vec<Url>, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut urls = Vec::with_capacity(config.backends.len());

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }

    for address in &config.backends {
        match Url::parse(address) {
            Ok(url) => {
                if url.scheme() != "http" {
                    errors.push(ValidationError::UnsupportedScheme {
                        address: address.clone(),
                        scheme: url.scheme().to_string(),
                    });
                } else if url.host_str().is_none() {
                    errors.push(ValidationError::InvalidBackend {
                        address: address.clone(),
                        reason: "missing host".to_string(),
                    });
                } else {
                    urls.push(url);
                }
            }
            Err(e) => {
                errors.push(ValidationError::InvalidBackend {
                    address: address.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.proxy.max_attempts == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "proxy.max_attempts",
        });
    }
    if config.health_check.interval_secs == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "health_check.interval_secs",
        });
    }
    if config.health_check.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue {
            field: "health_check.timeout_secs",
        });
    }

    if errors.is_empty() {
        Ok(urls)
    } else {
        Err(errors)
    }
}
