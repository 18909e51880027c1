//! Cache-aside accessors for the upstream store API.
//!
//! Every read follows the same path: derive a cache key from the operation and
//! its parameters, return the cached body on a hit, otherwise issue one
//! logical request through [`ApiClient`] and cache the raw body under that key.
//! Records are passed through as opaque JSON.

pub mod carts;
pub mod products;
pub mod users;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::ResponseCache;
use crate::transport::{ApiClient, ApiRequest, TransportError};

pub use carts::Carts;
pub use products::Products;
pub use users::Users;

/// Cache-key token for an absent `limit`.
const NO_LIMIT: &str = "all";
/// Cache-key token for an absent `sort`.
const NO_SORT: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream client plus the response cache shared by all accessors.
#[derive(Clone)]
pub struct StoreApi {
    client: ApiClient,
    cache: Arc<ResponseCache>,
}

impl StoreApi {
    pub fn new(client: ApiClient, cache: Arc<ResponseCache>) -> Self {
        Self { client, cache }
    }

    pub fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    pub fn carts(&self) -> Carts<'_> {
        Carts::new(self)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    async fn cached(&self, key: String, request: ApiRequest) -> Result<Value, TransportError> {
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        tracing::debug!(key = %key, "Cache miss");
        let body = self.client.execute(&request).await?;
        self.cache.set(key, body.clone());
        Ok(body)
    }
}

/// Key for list operations, e.g. `products_5_asc` or `users_all`.
fn list_key(resource: &str, limit: Option<u32>, sort: Option<SortOrder>) -> String {
    let limit = limit.map_or_else(|| NO_LIMIT.to_string(), |l| l.to_string());
    format!("{resource}_{limit}_{}", sort.map_or(NO_SORT, |s| s.as_str()))
}

fn limit_key(resource: &str, limit: Option<u32>) -> String {
    let limit = limit.map_or_else(|| NO_LIMIT.to_string(), |l| l.to_string());
    format!("{resource}_{limit}")
}
