use crate::api::StoreApi;
use crate::error::ToolError;
use crate::protocol::{CategoryParams, IdParams, ListParams, ToolResult};
use crate::schema::{ObjectSchema, SchemaError};

use super::{fetch_failed, require_entity, ToolCall, ToolDescriptor};

pub const GET_PRODUCTS: &str = "get_products";
pub const GET_PRODUCT: &str = "get_product";
pub const GET_CATEGORIES: &str = "get_categories";
pub const GET_PRODUCTS_BY_CATEGORY: &str = "get_products_by_category";

pub(super) fn descriptors() -> Result<Vec<ToolDescriptor>, SchemaError> {
    Ok(vec![
        ToolDescriptor::new(
            GET_PRODUCTS,
            "Get all products from Fake Store API with optional limit and sort",
            ObjectSchema::new()
                .limit("Maximum number of products to return")
                .sort()
                .build(),
            |args| serde_json::from_value(args).map(ToolCall::GetProducts),
        )?,
        ToolDescriptor::new(
            GET_PRODUCT,
            "Get a single product by ID from Fake Store API",
            ObjectSchema::new().id("id", "Product ID").build(),
            |args| serde_json::from_value(args).map(ToolCall::GetProduct),
        )?,
        ToolDescriptor::new(
            GET_CATEGORIES,
            "Get all product categories from Fake Store API",
            ObjectSchema::new().build(),
            |_| Ok(ToolCall::GetCategories),
        )?,
        ToolDescriptor::new(
            GET_PRODUCTS_BY_CATEGORY,
            "Get products filtered by category from Fake Store API",
            ObjectSchema::new()
                .non_empty_string("category", "Category name (e.g., electronics, jewelery)")
                .build(),
            |args| serde_json::from_value(args).map(ToolCall::GetProductsByCategory),
        )?,
    ])
}

pub(super) async fn get_products(api: &StoreApi, params: ListParams) -> Result<ToolResult, ToolError> {
    tracing::info!(limit = ?params.limit, sort = ?params.sort, "Fetching products");
    let products = api
        .products()
        .list(params.limit, params.sort)
        .await
        .map_err(|e| fetch_failed("products", e))?;
    Ok(ToolResult::json(&products))
}

pub(super) async fn get_product(api: &StoreApi, params: IdParams) -> Result<ToolResult, ToolError> {
    tracing::info!(id = params.id, "Fetching product");
    let product = api
        .products()
        .get(params.id)
        .await
        .map_err(|e| fetch_failed("product", e))?;
    let product =
        require_entity(product, "Product", params.id).map_err(|e| fetch_failed("product", e))?;
    Ok(ToolResult::json(&product))
}

pub(super) async fn get_categories(api: &StoreApi) -> Result<ToolResult, ToolError> {
    tracing::info!("Fetching categories");
    let categories = api
        .products()
        .categories()
        .await
        .map_err(|e| fetch_failed("categories", e))?;
    Ok(ToolResult::json(&categories))
}

pub(super) async fn get_by_category(
    api: &StoreApi,
    params: CategoryParams,
) -> Result<ToolResult, ToolError> {
    tracing::info!(category = %params.category, "Fetching products by category");
    let products = api
        .products()
        .by_category(&params.category)
        .await
        .map_err(|e| fetch_failed("products by category", e))?;
    Ok(ToolResult::json(&products))
}
