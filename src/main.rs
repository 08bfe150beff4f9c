//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, builds the AWS context, and
//! starts the server with the configured transport.

use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use aws_mcp_server::core::aws::{AwsContext, SdkClients};
use aws_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    // Build the AWS clients from the ambient credential chain. This is the
    // one-time startup phase; the context is read-only afterwards.
    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await;
    let clients = Arc::new(SdkClients::new(sdk_config));
    let aws = Arc::new(AwsContext::shared(
        config.aws.default_region.clone(),
        clients,
    ));

    // Create the MCP server
    let server = McpServer::new(config.clone(), aws);

    info!(
        tools = server.tool_count(),
        default_region = %config.aws.default_region,
        "Server initialized"
    );

    // Create and run the transport service
    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format. Output goes
/// to stderr so it never interferes with the STDIO transport.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
