//! End-to-end tool dispatch: catalog, envelopes, and failure normalisation.

mod common;

use std::sync::Arc;

use serde_json::{json, Value};

use common::{envelope_json, network_error, registry, MockTransport};
use fakestore_mcp_server::api::StoreApi;
use fakestore_mcp_server::cache::ResponseCache;
use fakestore_mcp_server::error::{ErrorKind, FetchError, ToolError};
use fakestore_mcp_server::tools::ToolRegistry;
use fakestore_mcp_server::transport::{ApiClient, TransportError};

fn product_one() -> Value {
    json!({
        "id": 1,
        "title": "X",
        "price": 9.99,
        "description": "Your perfect pack for everyday use and walks in the forest.",
        "category": "men's clothing",
        "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
        "rating": { "rate": 3.9, "count": 120 }
    })
}

#[tokio::test]
async fn get_product_returns_the_record_verbatim() {
    let transport = MockTransport::always(product_one());
    let registry = registry(transport.clone());

    let result = registry
        .call_tool("get_product", Some(json!({"id": 1})))
        .await
        .unwrap();

    assert_eq!(envelope_json(&result), product_one());
    assert_eq!(transport.requests()[0].path(), "/products/1");
}

#[tokio::test]
async fn empty_single_entity_is_not_found() {
    let transport = MockTransport::always(Value::Null);
    let registry = registry(transport.clone());

    let err = registry
        .call_tool("get_product", Some(json!({"id": 99999})))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        err,
        ToolError::Fetch {
            resource: "product",
            source: FetchError::NotFound { entity: "Product", id: 99999 },
        }
    );
    assert!(err.to_string().contains("not found"));
    assert_eq!(err.to_string(), "Failed to fetch product: Product with ID 99999 not found");
    assert_eq!(transport.call_count(), 1, "not-found is never retried");
}

#[tokio::test]
async fn empty_cart_and_user_are_not_found() {
    let registry = registry(MockTransport::always(Value::String(String::new())));

    let cart = registry.call_tool("get_cart", Some(json!({"id": 42}))).await.unwrap_err();
    assert_eq!(cart.to_string(), "Failed to fetch cart: Cart with ID 42 not found");

    let user = registry.call_tool("get_user", Some(json!({"id": 7}))).await.unwrap_err();
    assert_eq!(user.to_string(), "Failed to fetch user: User with ID 7 not found");
}

#[tokio::test]
async fn invalid_arguments_never_reach_upstream() {
    let transport = MockTransport::always(json!([]));
    let registry = registry(transport.clone());

    let err = registry
        .call_tool("get_products", Some(json!({"limit": -5})))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some("limit"));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn second_identical_call_is_served_from_cache() {
    let transport = MockTransport::new(|_, n| {
        if n == 0 {
            Ok(json!(["electronics", "jewelery", "men's clothing", "women's clothing"]))
        } else {
            Err(TransportError::Status { status: 500 })
        }
    });
    let registry = registry(transport.clone());

    let first = registry.call_tool("get_categories", Some(json!({}))).await.unwrap();
    let second = registry.call_tool("get_categories", Some(json!({}))).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn float_limit_shares_the_integer_cache_entry() {
    let transport = MockTransport::always(json!([{"id": 1}]));
    let registry = registry(transport.clone());

    registry.call_tool("get_products", Some(json!({"limit": 5}))).await.unwrap();
    registry.call_tool("get_products", Some(json!({"limit": 5.0}))).await.unwrap();

    assert_eq!(transport.call_count(), 1);
    assert_eq!(transport.requests()[0].to_string(), "GET /products?limit=5");
    assert!(registry.api().cache().get("products_5_none").is_some());
}

#[tokio::test]
async fn unknown_tool_is_rejected() {
    let transport = MockTransport::always(json!([]));
    let registry = registry(transport.clone());

    let err = registry.call_tool("delete_everything", None).await.unwrap_err();

    assert_eq!(err, ToolError::UnknownTool { name: "delete_everything".into() });
    assert_eq!(err.kind(), ErrorKind::UnknownTool);
    assert_eq!(err.to_string(), "Unknown tool: delete_everything");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn exhausted_retries_surface_as_transport_failure() {
    let transport = MockTransport::failing(network_error());
    let registry = registry(transport.clone());

    let err = registry
        .call_tool("get_user_carts", Some(json!({"userId": 2})))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.to_string(), "Failed to fetch user carts: connect ECONNREFUSED");
    assert_eq!(transport.call_count(), 4);
}

#[tokio::test]
async fn upstream_status_is_preserved() {
    let registry = registry(MockTransport::failing(TransportError::Status { status: 502 }));

    let err = registry.call_tool("get_users", None).await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(
        err.to_string(),
        "Failed to fetch users: Request failed with status code 502"
    );
}

#[tokio::test]
async fn every_tool_hits_its_endpoint() {
    let transport = MockTransport::new(|_, _| Ok(json!({"ok": true})));
    let registry = registry(transport.clone());

    let calls = [
        ("get_products", json!({"limit": 5, "sort": "desc"}), "GET /products?limit=5&sort=desc"),
        ("get_product", json!({"id": 3}), "GET /products/3"),
        ("get_categories", json!({}), "GET /products/categories"),
        ("get_products_by_category", json!({"category": "jewelery"}), "GET /products/category/jewelery"),
        ("get_carts", json!({}), "GET /carts"),
        ("get_cart", json!({"id": 2}), "GET /carts/2"),
        ("get_user_carts", json!({"userId": 1}), "GET /carts/user/1"),
        ("get_users", json!({"limit": 1}), "GET /users?limit=1"),
        ("get_user", json!({"id": 9}), "GET /users/9"),
    ];

    for (tool, args, _) in &calls {
        let result = registry.call_tool(tool, Some(args.clone())).await.unwrap();
        assert_eq!(envelope_json(&result), json!({"ok": true}), "{tool}");
    }

    let seen: Vec<String> = transport.requests().iter().map(|r| r.to_string()).collect();
    let expected: Vec<&str> = calls.iter().map(|(_, _, req)| *req).collect();
    assert_eq!(seen, expected);
}

#[test]
fn catalog_lists_nine_tools_in_order() {
    let registry = registry(MockTransport::always(json!([])));
    let names: Vec<String> = registry.list_tools().into_iter().map(|t| t.name).collect();

    assert_eq!(
        names,
        vec![
            "get_products",
            "get_product",
            "get_categories",
            "get_products_by_category",
            "get_carts",
            "get_cart",
            "get_user_carts",
            "get_users",
            "get_user",
        ]
    );
}

#[test]
fn listed_schemas_omit_the_dialect_marker() {
    let registry = registry(MockTransport::always(json!([])));

    for tool in registry.list_tools() {
        assert!(tool.input_schema.get("$schema").is_none(), "{}", tool.name);
        assert_eq!(tool.input_schema["type"], "object");
        assert!(!tool.description.is_empty());
    }

    let declared = registry.get("get_product").unwrap().input_schema().document();
    assert!(declared.get("$schema").is_some(), "declared schema keeps its dialect");
}

#[test]
fn list_tools_is_stable() {
    let registry = registry(MockTransport::always(json!([])));

    let first = serde_json::to_string(&registry.list_tools()).unwrap();
    let second = serde_json::to_string(&registry.list_tools()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn product_list_schema_is_exact() {
    let registry = registry(MockTransport::always(json!([])));
    let info = registry.get("get_products").unwrap().info();

    assert_eq!(
        info.input_schema,
        json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "exclusiveMinimum": 0,
                    "maximum": 100,
                    "description": "Maximum number of products to return"
                },
                "sort": {
                    "type": "string",
                    "enum": ["asc", "desc"],
                    "description": "Sort order: asc or desc"
                }
            }
        })
    );
}

#[tokio::test]
async fn registry_exposes_shared_api() {
    let cache = Arc::new(ResponseCache::new());
    let transport = MockTransport::always(json!([]));
    let api = StoreApi::new(ApiClient::new(transport.clone()), cache.clone());
    let registry = ToolRegistry::new(api).unwrap();

    registry.call_tool("get_carts", None).await.unwrap();
    assert_eq!(registry.api().cache().size(), 1);
    assert_eq!(cache.size(), 1);
}
