use serde::{Deserialize, Serialize};

use crate::api::SortOrder;

/// JSON-RPC 2.0 ID, either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(i64),
    Str(String),
}

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<RpcId>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// MCP `initialize` params.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: Option<String>,
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

/// Client information sent during `initialize`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Parameters for `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

/// Arguments for `get_products` and `get_carts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub sort: Option<SortOrder>,
}

/// Arguments for `get_users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LimitParams {
    pub limit: Option<u32>,
}

/// Arguments for single-entity tools (`get_product`, `get_cart`, `get_user`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdParams {
    pub id: u64,
}

/// Arguments for `get_products_by_category`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryParams {
    pub category: String,
}

/// Arguments for `get_user_carts`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserCartsParams {
    #[serde(rename = "userId")]
    pub user_id: u64,
}
