use crate::api::StoreApi;
use crate::error::ToolError;
use crate::protocol::{IdParams, LimitParams, ToolResult};
use crate::schema::{ObjectSchema, SchemaError};

use super::{fetch_failed, require_entity, ToolCall, ToolDescriptor};

pub const GET_USERS: &str = "get_users";
pub const GET_USER: &str = "get_user";

pub(super) fn descriptors() -> Result<Vec<ToolDescriptor>, SchemaError> {
    Ok(vec![
        ToolDescriptor::new(
            GET_USERS,
            "Get all users from Fake Store API with optional limit",
            ObjectSchema::new()
                .limit("Maximum number of users to return")
                .build(),
            |args| serde_json::from_value(args).map(ToolCall::GetUsers),
        )?,
        ToolDescriptor::new(
            GET_USER,
            "Get a single user by ID from Fake Store API",
            ObjectSchema::new().id("id", "User ID").build(),
            |args| serde_json::from_value(args).map(ToolCall::GetUser),
        )?,
    ])
}

pub(super) async fn get_users(api: &StoreApi, params: LimitParams) -> Result<ToolResult, ToolError> {
    tracing::info!(limit = ?params.limit, "Fetching users");
    let users = api
        .users()
        .list(params.limit)
        .await
        .map_err(|e| fetch_failed("users", e))?;
    Ok(ToolResult::json(&users))
}

pub(super) async fn get_user(api: &StoreApi, params: IdParams) -> Result<ToolResult, ToolError> {
    tracing::info!(id = params.id, "Fetching user");
    let user = api
        .users()
        .get(params.id)
        .await
        .map_err(|e| fetch_failed("user", e))?;
    let user = require_entity(user, "User", params.id).map_err(|e| fetch_failed("user", e))?;
    Ok(ToolResult::json(&user))
}
