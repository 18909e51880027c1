pub mod request;
pub mod response;

pub use request::{
    CategoryParams, IdParams, InitializeParams, JsonRpcRequest, LimitParams, ListParams, RpcId,
    ToolCallParams, UserCartsParams,
};
pub use response::{JsonRpcError, JsonRpcResponse, ToolInfo, ToolResult, ToolResultContent};
