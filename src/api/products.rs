use serde_json::Value;

use super::{list_key, SortOrder, StoreApi};
use crate::transport::{ApiRequest, TransportError};

/// `/products` family.
pub struct Products<'a> {
    api: &'a StoreApi,
}

impl<'a> Products<'a> {
    pub(super) fn new(api: &'a StoreApi) -> Self {
        Self { api }
    }

    pub async fn list(
        &self,
        limit: Option<u32>,
        sort: Option<SortOrder>,
    ) -> Result<Value, TransportError> {
        let request = ApiRequest::get(["products"])
            .query_opt("limit", limit)
            .query_opt("sort", sort);
        self.api.cached(list_key("products", limit, sort), request).await
    }

    /// Single product. An unknown id yields `Value::Null` rather than an error.
    pub async fn get(&self, id: u64) -> Result<Value, TransportError> {
        let request = ApiRequest::get(["products".to_string(), id.to_string()]);
        self.api.cached(format!("product_{id}"), request).await
    }

    pub async fn categories(&self) -> Result<Value, TransportError> {
        let request = ApiRequest::get(["products", "categories"]);
        self.api.cached("categories".to_string(), request).await
    }

    pub async fn by_category(&self, category: &str) -> Result<Value, TransportError> {
        let request = ApiRequest::get(["products", "category", category]);
        self.api
            .cached(format!("products_category_{category}"), request)
            .await
    }
}
