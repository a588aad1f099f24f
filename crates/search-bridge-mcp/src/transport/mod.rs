//! Transport layer for talking to MCP tool servers.

pub mod child;
pub mod framing;
pub mod line;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::McpResult;

pub use child::ChildProcessTransport;
pub use line::LineTransport;

/// A bidirectional JSON-RPC channel to one tool server.
#[async_trait]
pub trait Transport: Send {
    /// Send a request and wait for the matching response's `result`.
    async fn request(&mut self, method: &str, params: Option<Value>) -> McpResult<Value>;

    /// Send a notification; no response is expected.
    async fn notify(&mut self, method: &str, params: Option<Value>) -> McpResult<()>;

    /// Release the channel. Must be called exactly once.
    async fn close(&mut self) -> McpResult<()>;
}
