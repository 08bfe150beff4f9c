//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server:
//! error handling, configuration, the AWS client seam, server lifecycle
//! management, and transport layer abstractions.

pub mod aws;
pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use aws::AwsContext;
pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
