//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the tap.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the tap.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TapConfig {
    /// Collector endpoint and delivery bounds.
    pub collector: CollectorConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Collector endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Collector address (e.g., "127.0.0.1:4519").
    pub address: String,

    /// Connect timeout per delivery attempt in milliseconds.
    pub connect_timeout_ms: u64,

    /// Send/flush timeout per delivery attempt in milliseconds.
    pub send_timeout_ms: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:4519".to_string(),
            connect_timeout_ms: 250,
            send_timeout_ms: 250,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9465".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_loopback() {
        let config = TapConfig::default();
        assert_eq!(config.collector.address, "127.0.0.1:4519");
        assert_eq!(config.collector.connect_timeout_ms, 250);
        assert_eq!(config.collector.send_timeout_ms, 250);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config: TapConfig = toml::from_str("").unwrap();
        assert_eq!(config.collector.address, "127.0.0.1:4519");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn partial_toml_overrides_one_field() {
        let config: TapConfig = toml::from_str(
            r#"
            [collector]
            address = "127.0.0.1:7000"
            "#,
        )
        .unwrap();
        assert_eq!(config.collector.address, "127.0.0.1:7000");
        assert_eq!(config.collector.connect_timeout_ms, 250);
    }
}
