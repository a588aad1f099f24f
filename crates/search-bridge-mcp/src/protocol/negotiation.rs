//! Checking what the server answered to `initialize`.

use crate::types::{Implementation, InitializeResult, McpError, McpResult, MCP_VERSION};

/// What we learned about the server during initialization.
#[derive(Debug, Clone)]
pub struct NegotiatedServer {
    pub server_info: Implementation,
    pub protocol_version: String,
    pub supports_tools: bool,
}

impl NegotiatedServer {
    pub fn negotiate(result: InitializeResult) -> McpResult<Self> {
        if result.protocol_version.trim().is_empty() {
            return Err(McpError::InvalidResponse(
                "initialize result has an empty protocolVersion".to_string(),
            ));
        }

        if result.protocol_version != MCP_VERSION {
            tracing::warn!(
                "Server speaks protocol version {}, client requested {}. Proceeding anyway.",
                result.protocol_version,
                MCP_VERSION
            );
        }

        let supports_tools = result.capabilities.tools.is_some();
        if !supports_tools {
            tracing::warn!(
                "Server {} does not advertise tools; calls may fail",
                result.server_info.name
            );
        }

        tracing::info!(
            "Connected to tool server: {} v{}",
            result.server_info.name,
            result.server_info.version
        );

        Ok(Self {
            server_info: result.server_info,
            protocol_version: result.protocol_version,
            supports_tools,
        })
    }
}
