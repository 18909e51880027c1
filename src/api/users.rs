use serde_json::Value;

use super::{limit_key, StoreApi};
use crate::transport::{ApiRequest, TransportError};

/// `/users` family. The upstream offers no sort on users.
pub struct Users<'a> {
    api: &'a StoreApi,
}

impl<'a> Users<'a> {
    pub(super) fn new(api: &'a StoreApi) -> Self {
        Self { api }
    }

    pub async fn list(&self, limit: Option<u32>) -> Result<Value, TransportError> {
        let request = ApiRequest::get(["users"]).query_opt("limit", limit);
        self.api.cached(limit_key("users", limit), request).await
    }

    pub async fn get(&self, id: u64) -> Result<Value, TransportError> {
        let request = ApiRequest::get(["users".to_string(), id.to_string()]);
        self.api.cached(format!("user_{id}"), request).await
    }
}
