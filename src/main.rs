//! MySQL MCP Server - Main entry point.
//!
//! This server exposes MySQL schema introspection and read-only queries as
//! MCP (Model Context Protocol) tools over stdio or HTTP, or as an
//! interactive terminal menu.

use mysql_mcp_server::config::{Config, TransportMode};
use mysql_mcp_server::db::MySqlDatabase;
use mysql_mcp_server::tools::QueryEngine;
use mysql_mcp_server::transport::{HttpTransport, InteractiveTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr: stdout carries JSON-RPC in stdio mode and the menu in
/// interactive mode.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse_args();

    init_tracing(&config);

    info!(
        transport = %config.transport,
        "Starting MySQL MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let database = match MySqlDatabase::connect(&config).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, url = %config.masked_url(), "Failed to connect to MySQL");
            return Err(e.into());
        }
    };

    let engine = Arc::new(QueryEngine::new(Arc::new(database)));

    let result = match config.transport {
        TransportMode::Stdio => {
            let transport = StdioTransport::new(engine);
            info!(transport = transport.name(), "Using stdio transport");
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                engine,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
        TransportMode::Interactive => {
            info!("Using interactive transport");
            InteractiveTransport::stdio(engine).run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
