//! Tool catalog and the `tools/call` dispatch pipeline.
//!
//! A call moves through: lookup by name → schema validation → typed
//! argument parsing → execution against [`StoreApi`] → [`ToolResult`].
//! Any failure ends the call with a [`ToolError`]; nothing is retried here.

pub mod carts;
pub mod products;
pub mod users;

use serde_json::{Map, Value};

use crate::api::StoreApi;
use crate::error::{FetchError, ToolError};
use crate::protocol::{
    CategoryParams, IdParams, LimitParams, ListParams, ToolInfo, ToolResult, UserCartsParams,
};
use crate::schema::{InputSchema, SchemaError};

/// Validated, typed arguments bound to the tool they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    GetProducts(ListParams),
    GetProduct(IdParams),
    GetCategories,
    GetProductsByCategory(CategoryParams),
    GetCarts(ListParams),
    GetCart(IdParams),
    GetUserCarts(UserCartsParams),
    GetUsers(LimitParams),
    GetUser(IdParams),
}

impl ToolCall {
    pub async fn execute(self, api: &StoreApi) -> Result<ToolResult, ToolError> {
        match self {
            Self::GetProducts(params) => products::get_products(api, params).await,
            Self::GetProduct(params) => products::get_product(api, params).await,
            Self::GetCategories => products::get_categories(api).await,
            Self::GetProductsByCategory(params) => products::get_by_category(api, params).await,
            Self::GetCarts(params) => carts::get_carts(api, params).await,
            Self::GetCart(params) => carts::get_cart(api, params).await,
            Self::GetUserCarts(params) => carts::get_user_carts(api, params).await,
            Self::GetUsers(params) => users::get_users(api, params).await,
            Self::GetUser(params) => users::get_user(api, params).await,
        }
    }
}

type ParseFn = fn(Value) -> Result<ToolCall, serde_json::Error>;

/// One entry in the tool catalog.
pub struct ToolDescriptor {
    name: &'static str,
    description: &'static str,
    schema: InputSchema,
    parse: ParseFn,
}

impl ToolDescriptor {
    pub fn new(
        name: &'static str,
        description: &'static str,
        schema: Value,
        parse: ParseFn,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            name,
            description,
            schema: InputSchema::compile(schema)?,
            parse,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn input_schema(&self) -> &InputSchema {
        &self.schema
    }

    pub fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.schema.public_document(),
        }
    }

    /// Check raw arguments against the schema and bind them to a [`ToolCall`].
    ///
    /// `null` is treated as an empty argument object. Whole-number floats in
    /// integer fields are accepted as integers.
    pub fn validate(&self, args: Value) -> Result<ToolCall, ToolError> {
        let mut args = match args {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        self.schema
            .validate(&args)
            .map_err(|violation| ToolError::Validation {
                tool: self.name.to_string(),
                field: violation.field,
                message: violation.message,
            })?;
        self.schema.normalize_integers(&mut args);

        (self.parse)(args).map_err(|e| ToolError::Validation {
            tool: self.name.to_string(),
            field: None,
            message: e.to_string(),
        })
    }
}

/// Fixed, ordered tool catalog over a shared [`StoreApi`].
pub struct ToolRegistry {
    api: StoreApi,
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new(api: StoreApi) -> Result<Self, SchemaError> {
        let mut tools = products::descriptors()?;
        tools.extend(carts::descriptors()?);
        tools.extend(users::descriptors()?);
        Ok(Self { api, tools })
    }

    pub fn api(&self) -> &StoreApi {
        &self.api
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Catalog in registration order, schemas stripped of `$schema`.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        tracing::info!("Listing all tools");
        self.tools.iter().map(ToolDescriptor::info).collect()
    }

    pub async fn call_tool(&self, name: &str, args: Option<Value>) -> Result<ToolResult, ToolError> {
        let arguments = args.unwrap_or(Value::Null);
        tracing::info!(tool = name, arguments = %arguments, "Tool called");

        let result = match self.get(name) {
            Some(tool) => match tool.validate(arguments.clone()) {
                Ok(call) => call.execute(&self.api).await,
                Err(err) => Err(err),
            },
            None => Err(ToolError::UnknownTool { name: name.to_string() }),
        };

        match &result {
            Ok(_) => tracing::info!(tool = name, "Tool executed successfully"),
            Err(err) => tracing::error!(
                tool = name,
                arguments = %arguments,
                kind = ?err.kind(),
                status = ?err.status(),
                error = %err,
                "Tool execution failed"
            ),
        }
        result
    }
}

/// Tag a fetch failure with the resource the tool was after.
fn fetch_failed(resource: &'static str, source: impl Into<FetchError>) -> ToolError {
    let source = source.into();
    tracing::error!(error = %source, "Error fetching {resource}");
    ToolError::Fetch { resource, source }
}

/// Reject the empty body the upstream returns for an unknown id.
fn require_entity(value: Value, entity: &'static str, id: u64) -> Result<Value, FetchError> {
    match &value {
        Value::Null => Err(FetchError::NotFound { entity, id }),
        Value::String(s) if s.is_empty() => Err(FetchError::NotFound { entity, id }),
        _ => Ok(value),
    }
}
