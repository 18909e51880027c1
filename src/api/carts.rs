use serde_json::Value;

use super::{list_key, SortOrder, StoreApi};
use crate::transport::{ApiRequest, TransportError};

/// `/carts` family.
pub struct Carts<'a> {
    api: &'a StoreApi,
}

impl<'a> Carts<'a> {
    pub(super) fn new(api: &'a StoreApi) -> Self {
        Self { api }
    }

    pub async fn list(
        &self,
        limit: Option<u32>,
        sort: Option<SortOrder>,
    ) -> Result<Value, TransportError> {
        let request = ApiRequest::get(["carts"])
            .query_opt("limit", limit)
            .query_opt("sort", sort);
        self.api.cached(list_key("carts", limit, sort), request).await
    }

    pub async fn get(&self, id: u64) -> Result<Value, TransportError> {
        let request = ApiRequest::get(["carts".to_string(), id.to_string()]);
        self.api.cached(format!("cart_{id}"), request).await
    }

    pub async fn by_user(&self, user_id: u64) -> Result<Value, TransportError> {
        let request = ApiRequest::get(["carts".to_string(), "user".to_string(), user_id.to_string()]);
        self.api.cached(format!("carts_user_{user_id}"), request).await
    }
}
