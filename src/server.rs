use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::handlers;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::tools::ToolRegistry;

/// Maximum bytes per JSON-RPC message (1 MiB).
const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// MCP server that communicates over stdio using newline-delimited JSON-RPC 2.0.
///
/// Each request after the handshake runs on its own task, so a slow tool call
/// does not hold up the ones behind it. Responses are written by a single
/// writer in completion order.
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    initialized: bool,
}

impl McpServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            initialized: false,
        }
    }

    /// Serve stdin/stdout until stdin closes.
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve any line-oriented reader/writer pair until the reader hits EOF
    /// and every in-flight request has been answered.
    pub async fn serve<R, W>(&mut self, reader: R, writer: W) -> Result<(), Box<dyn std::error::Error>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::try_join!(self.read_loop(reader, tx), write_loop(writer, rx))?;
        Ok(())
    }

    async fn read_loop<R>(
        &mut self,
        mut reader: R,
        tx: mpsc::UnboundedSender<JsonRpcResponse>,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut raw = Vec::new();

        loop {
            raw.clear();
            let n = reader.read_until(b'\n', &mut raw).await?;
            if n == 0 {
                tracing::info!("Input closed, stopping server");
                break;
            }

            if n > MAX_MESSAGE_BYTES {
                tracing::warn!(bytes = n, limit = MAX_MESSAGE_BYTES, "Message too large");
                let _ = tx.send(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
                continue;
            }

            let trimmed = match std::str::from_utf8(&raw) {
                Ok(s) => s.trim(),
                Err(_) => {
                    let _ = tx.send(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
                    continue;
                }
            };

            if trimmed.is_empty() {
                continue;
            }

            let req: JsonRpcRequest = match serde_json::from_str(trimmed) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(error = %e, "Parse error");
                    let _ = tx.send(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
                    continue;
                }
            };

            // Validate jsonrpc version
            if req.jsonrpc != "2.0" {
                let _ = tx.send(JsonRpcResponse::error(req.id.clone(), JsonRpcError::invalid_request()));
                continue;
            }

            // Initialization gate: only `initialize` (and `ping`) are allowed before handshake completes
            if !self.initialized && req.method != "initialize" && req.method != "ping" {
                if req.id.is_some() {
                    let _ = tx.send(JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::invalid_request_with("Server not initialized"),
                    ));
                }
                continue;
            }

            tracing::debug!(method = %req.method, "Request received");

            // The handshake is answered inline so its reply precedes any tool output.
            if req.method == "initialize" {
                if let Some(resp) = handlers::dispatch(&req, &self.registry).await {
                    let _ = tx.send(resp);
                }
                self.initialized = true;
                continue;
            }

            let registry = Arc::clone(&self.registry);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(resp) = handlers::dispatch(&req, &registry).await {
                    let _ = tx.send(resp);
                }
            });
        }

        Ok(())
    }
}

/// Drain responses until every sender (the reader and all request tasks) is gone.
async fn write_loop<W>(
    mut writer: W,
    mut rx: mpsc::UnboundedReceiver<JsonRpcResponse>,
) -> Result<(), Box<dyn std::error::Error>>
where
    W: AsyncWrite + Unpin,
{
    while let Some(resp) = rx.recv().await {
        write_response(&mut writer, &resp).await?;
    }
    Ok(())
}

async fn write_response<W>(
    writer: &mut W,
    resp: &JsonRpcResponse,
) -> Result<(), Box<dyn std::error::Error>>
where
    W: AsyncWrite + Unpin,
{
    let out = serde_json::to_string(resp)?;
    writer.write_all(out.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
