//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TapConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::TapConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a deserialized config, collecting every failure.
pub fn validate_config(config: &TapConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.collector.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "collector.address".to_string(),
            message: format!("'{}' is not a valid socket address", config.collector.address),
        });
    }

    if config.collector.connect_timeout_ms == 0 {
        errors.push(ValidationError {
            field: "collector.connect_timeout_ms".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.collector.send_timeout_ms == 0 {
        errors.push(ValidationError {
            field: "collector.send_timeout_ms".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address".to_string(),
            message: format!(
                "'{}' is not a valid socket address",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
