use crate::protocol::{
    InitializeParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolCallParams,
};
use crate::tools::ToolRegistry;

/// MCP protocol revision announced during `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "fakestore-mcp-server";

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch(req: &JsonRpcRequest, registry: &ToolRegistry) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => {
            let params = req
                .params
                .as_ref()
                .and_then(|v| serde_json::from_value::<InitializeParams>(v.clone()).ok());
            if let Some(params) = params {
                let client = params.client_info.as_ref();
                tracing::info!(
                    protocol_version = ?params.protocol_version,
                    client = ?client.and_then(|c| c.name.as_deref()),
                    client_version = ?client.and_then(|c| c.version.as_deref()),
                    "Client initializing"
                );
            }

            let result = serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "notifications/initialized" => None,

        "ping" => Some(JsonRpcResponse::success(req.id.clone(), serde_json::json!({}))),

        "tools/list" => {
            let tools = registry.list_tools();
            Some(match serde_json::to_value(&tools) {
                Ok(tools) => {
                    JsonRpcResponse::success(req.id.clone(), serde_json::json!({ "tools": tools }))
                }
                Err(e) => JsonRpcResponse::error(
                    req.id.clone(),
                    JsonRpcError::internal_error(format!("Cannot serialize tool list: {e}")),
                ),
            })
        }

        "tools/call" => {
            let params: ToolCallParams = match &req.params {
                Some(v) => match serde_json::from_value(v.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            req.id.clone(),
                            JsonRpcError::invalid_params(format!(
                                "Invalid tools/call params: {e}"
                            )),
                        ));
                    }
                },
                None => {
                    return Some(JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::invalid_params("Missing params for tools/call"),
                    ));
                }
            };

            let outcome = registry.call_tool(&params.name, params.arguments).await;
            let response = match outcome.map(|r| serde_json::to_value(&r)) {
                Ok(Ok(result)) => JsonRpcResponse::success(req.id.clone(), result),
                Ok(Err(e)) => JsonRpcResponse::error(
                    req.id.clone(),
                    JsonRpcError::internal_error(format!("Cannot serialize tool result: {e}")),
                ),
                Err(err) => JsonRpcResponse::error(req.id.clone(), JsonRpcError::from(&err)),
            };
            Some(response)
        }

        _ if req.id.is_none() => None,

        _ => Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}
