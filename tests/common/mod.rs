//! Shared fixtures: a scripted in-memory transport and registry builders.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use fakestore_mcp_server::api::StoreApi;
use fakestore_mcp_server::cache::ResponseCache;
use fakestore_mcp_server::tools::ToolRegistry;
use fakestore_mcp_server::transport::{ApiClient, ApiRequest, HttpTransport, RetryPolicy, TransportError};

type Handler = dyn Fn(&ApiRequest, usize) -> Result<Value, TransportError> + Send + Sync;

/// Transport whose answers come from a closure of `(request, call_index)`.
pub struct MockTransport {
    handler: Box<Handler>,
    calls: Mutex<Vec<(ApiRequest, Instant)>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&ApiRequest, usize) -> Result<Value, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Answer every request with `body`.
    pub fn always(body: Value) -> Arc<Self> {
        Self::new(move |_, _| Ok(body.clone()))
    }

    /// Fail every request with `err`.
    pub fn failing(err: TransportError) -> Arc<Self> {
        Self::new(move |_, _| Err(err.clone()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().iter().map(|(r, _)| r.clone()).collect()
    }

    /// Time elapsed between consecutive attempts.
    pub fn gaps(&self) -> Vec<Duration> {
        let calls = self.calls.lock().unwrap();
        calls.windows(2).map(|w| w[1].1 - w[0].1).collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((request.clone(), Instant::now()));
            calls.len() - 1
        };
        (self.handler)(request, index)
    }
}

pub fn network_error() -> TransportError {
    TransportError::Network {
        message: "connect ECONNREFUSED".into(),
    }
}

/// Retry schedule short enough for tests that do not pause time.
pub fn fast_retries() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(1),
    }
}

pub fn store_api(transport: Arc<MockTransport>, cache: Arc<ResponseCache>) -> StoreApi {
    StoreApi::new(ApiClient::new(transport).with_retry_policy(fast_retries()), cache)
}

pub fn registry(transport: Arc<MockTransport>) -> ToolRegistry {
    ToolRegistry::new(store_api(transport, Arc::new(ResponseCache::new()))).unwrap()
}

/// Parse the single text block of a tool result back into JSON.
pub fn envelope_json(result: &fakestore_mcp_server::protocol::ToolResult) -> Value {
    assert_eq!(result.content.len(), 1, "envelope carries exactly one block");
    assert_eq!(result.content[0].content_type, "text");
    serde_json::from_str(&result.content[0].text).unwrap()
}
