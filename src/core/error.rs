//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type that can represent errors from
//! all domains and external dependencies. Note that tool dispatch never
//! surfaces these to the host - handler and validation failures travel as
//! structured records inside normal results - so this type covers the
//! startup and resource paths.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the resources domain.
    #[error("Resource error: {0}")]
    Resource(#[from] crate::domains::resources::ResourceError),

    /// Error from the AWS client layer.
    #[error("AWS error: {0}")]
    Aws(#[from] crate::core::aws::AwsError),

    /// Error from the transport layer.
    #[error("Transport error: {0}")]
    Transport(#[from] crate::core::transport::TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aws::AwsError;
    use crate::domains::resources::ResourceError;

    #[test]
    fn test_error_conversions() {
        let err: Error = ResourceError::not_found("resource://aws/missing").into();
        assert!(err.to_string().contains("resource://aws/missing"));

        let err: Error = AwsError::api("AccessDenied").into();
        assert_eq!(err.to_string(), "AWS error: AccessDenied");
    }
}
