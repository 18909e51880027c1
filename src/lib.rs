//! MCP server for the Fake Store API.
//!
//! Exposes products, carts, and users as schema-validated tools over JSON-RPC
//! 2.0 stdio transport. Upstream responses are cached for five minutes and
//! failed requests are retried with exponential backoff.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod protocol;
pub mod schema;
pub mod server;
pub mod tools;
pub mod transport;
