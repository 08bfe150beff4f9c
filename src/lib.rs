//! MCP server exposing AWS EC2, EBS, and VPC operations as tools.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the AWS client seam, the main
//!   server, and transports
//! - **domains**: functionality organized by bounded contexts
//!   - **tools**: per-service action registries, dispatchers, and generated
//!     single-action tools
//!   - **resources**: static catalogue documents for host introspection
//!
//! Each service (EC2, EBS, VPC) builds one action registry at startup from
//! an explicit list of definition modules. The registry backs both a generic
//! dispatcher tool (`aws_ec2` etc.) and one generated tool per action
//! (`ec2_start_instance` etc.); both validate arguments against the action's
//! schema before the handler runs, and both always answer with a JSON record
//! rather than a protocol error.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use aws_mcp_server::core::aws::{AwsContext, SdkClients};
//! use aws_mcp_server::{Config, McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
//!         .load()
//!         .await;
//!     let clients = Arc::new(SdkClients::new(sdk_config));
//!     let aws = Arc::new(AwsContext::shared(
//!         config.aws.default_region.clone(),
//!         clients,
//!     ));
//!     let server = McpServer::new(config, aws);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
