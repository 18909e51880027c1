use crate::api::StoreApi;
use crate::error::ToolError;
use crate::protocol::{IdParams, ListParams, ToolResult, UserCartsParams};
use crate::schema::{ObjectSchema, SchemaError};

use super::{fetch_failed, require_entity, ToolCall, ToolDescriptor};

pub const GET_CARTS: &str = "get_carts";
pub const GET_CART: &str = "get_cart";
pub const GET_USER_CARTS: &str = "get_user_carts";

pub(super) fn descriptors() -> Result<Vec<ToolDescriptor>, SchemaError> {
    Ok(vec![
        ToolDescriptor::new(
            GET_CARTS,
            "Get all shopping carts from Fake Store API with optional limit and sort",
            ObjectSchema::new()
                .limit("Maximum number of carts to return")
                .sort()
                .build(),
            |args| serde_json::from_value(args).map(ToolCall::GetCarts),
        )?,
        ToolDescriptor::new(
            GET_CART,
            "Get a single shopping cart by ID from Fake Store API",
            ObjectSchema::new().id("id", "Cart ID").build(),
            |args| serde_json::from_value(args).map(ToolCall::GetCart),
        )?,
        ToolDescriptor::new(
            GET_USER_CARTS,
            "Get all shopping carts for a specific user from Fake Store API",
            ObjectSchema::new().id("userId", "User ID").build(),
            |args| serde_json::from_value(args).map(ToolCall::GetUserCarts),
        )?,
    ])
}

pub(super) async fn get_carts(api: &StoreApi, params: ListParams) -> Result<ToolResult, ToolError> {
    tracing::info!(limit = ?params.limit, sort = ?params.sort, "Fetching carts");
    let carts = api
        .carts()
        .list(params.limit, params.sort)
        .await
        .map_err(|e| fetch_failed("carts", e))?;
    Ok(ToolResult::json(&carts))
}

pub(super) async fn get_cart(api: &StoreApi, params: IdParams) -> Result<ToolResult, ToolError> {
    tracing::info!(id = params.id, "Fetching cart");
    let cart = api
        .carts()
        .get(params.id)
        .await
        .map_err(|e| fetch_failed("cart", e))?;
    let cart = require_entity(cart, "Cart", params.id).map_err(|e| fetch_failed("cart", e))?;
    Ok(ToolResult::json(&cart))
}

pub(super) async fn get_user_carts(
    api: &StoreApi,
    params: UserCartsParams,
) -> Result<ToolResult, ToolError> {
    tracing::info!(user_id = params.user_id, "Fetching user carts");
    let carts = api
        .carts()
        .by_user(params.user_id)
        .await
        .map_err(|e| fetch_failed("user carts", e))?;
    Ok(ToolResult::json(&carts))
}
