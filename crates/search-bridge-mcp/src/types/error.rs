//! Error types and JSON-RPC error codes for the MCP client.

use search_bridge::BridgeError;

use super::message::{JsonRpcError, JsonRpcErrorObject, RequestId, JSONRPC_VERSION};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// All errors that can occur while talking to a tool server.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// The server answered with a JSON-RPC error object.
    #[error("Server error {code}: {message}")]
    Remote { code: i32, message: String },

    #[error("Tool '{name}' failed: {message}")]
    ToolFailed { name: String, message: String },

    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The server closed its stdout before answering.
    #[error("Connection closed")]
    Closed,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        match self {
            McpError::ParseError(_) | McpError::Json(_) => PARSE_ERROR,
            McpError::InvalidResponse(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::Remote { code, .. } => *code,
            McpError::ToolFailed { .. }
            | McpError::Spawn { .. }
            | McpError::Closed
            | McpError::Transport(_)
            | McpError::Io(_) => INTERNAL_ERROR,
        }
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcErrorObject {
                code: self.code(),
                message: self.to_string(),
                data: None,
            },
        }
    }
}

impl From<JsonRpcErrorObject> for McpError {
    fn from(e: JsonRpcErrorObject) -> Self {
        McpError::Remote {
            code: e.code,
            message: e.message,
        }
    }
}

impl From<McpError> for BridgeError {
    fn from(e: McpError) -> Self {
        match e {
            McpError::ParseError(msg) => BridgeError::Parse(msg),
            McpError::Json(e) => BridgeError::Parse(e.to_string()),
            McpError::Io(e) => BridgeError::Io(e),
            other => BridgeError::Provider(other.to_string()),
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;
