use std::process::ExitCode;
use std::sync::Arc;

use fakestore_mcp_server::api::StoreApi;
use fakestore_mcp_server::cache::ResponseCache;
use fakestore_mcp_server::config::ServerConfig;
use fakestore_mcp_server::logging;
use fakestore_mcp_server::server::McpServer;
use fakestore_mcp_server::tools::ToolRegistry;
use fakestore_mcp_server::transport::{ApiClient, ReqwestTransport};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("fakestore-mcp-server: configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Dropped when `main` returns, which flushes the file sinks.
    let _log_guards = match logging::init(&config) {
        Ok(guards) => guards,
        Err(e) => {
            eprintln!("fakestore-mcp-server: cannot initialise logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    let registry = match build_registry(&config) {
        Ok(r) => Arc::new(r),
        Err(e) => {
            tracing::error!(error = %e, "Failed to start server");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(base_url = %config.base_url, "Starting MCP server for Fake Store API");
    let names: Vec<&str> = registry.tools().iter().map(|t| t.name()).collect();
    tracing::info!("Available tools: {}", names.join(", "));

    let mut server = McpServer::new(registry);
    let code = tokio::select! {
        result = server.run() => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "Fatal server error");
                ExitCode::FAILURE
            }
        },
        _ = shutdown_signal() => ExitCode::SUCCESS,
    };

    tracing::info!("Server stopped");
    code
}

fn build_registry(config: &ServerConfig) -> Result<ToolRegistry, Box<dyn std::error::Error>> {
    let transport = ReqwestTransport::new(config.base_url.clone(), config.request_timeout)?;
    let api = StoreApi::new(
        ApiClient::new(Arc::new(transport)),
        Arc::new(ResponseCache::new()),
    );
    Ok(ToolRegistry::new(api)?)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, shutting down gracefully");
}
