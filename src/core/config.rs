//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::transport::TransportConfig;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// AWS client configuration.
    pub aws: AwsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// AWS client configuration.
///
/// Credentials come from the SDK's normal provider chain; only the default
/// region lives here. Every action schema also takes a per-call `region`
/// override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Region used when a call does not specify one.
    pub default_region: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "aws-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            aws: AwsConfig {
                default_region: "us-east-1".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server/logging settings use the `MCP_` prefix; the default region
    /// follows the SDK convention (`AWS_DEFAULT_REGION`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(region) = std::env::var("AWS_DEFAULT_REGION") {
            config.aws.default_region = region;
        } else {
            warn!(
                "AWS_DEFAULT_REGION not set - defaulting to {}",
                config.aws.default_region
            );
        }

        config.transport = TransportConfig::from_env();

        config
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // Mutex to ensure env var tests run serially.
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_region() {
        let config = Config::default();
        assert_eq!(config.aws.default_region, "us-east-1");
        assert_eq!(config.server.name, "aws-mcp");
    }

    #[test]
    fn test_region_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("AWS_DEFAULT_REGION", "eu-central-1");
        }
        let config = Config::from_env();
        assert_eq!(config.aws.default_region, "eu-central-1");
        unsafe {
            std::env::remove_var("AWS_DEFAULT_REGION");
        }
    }

    #[test]
    fn test_server_name_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SERVER_NAME", "aws-mcp-test");
        }
        let config = Config::from_env();
        assert_eq!(config.server.name, "aws-mcp-test");
        unsafe {
            std::env::remove_var("MCP_SERVER_NAME");
        }
    }
}
