//! MCP client over any [`Transport`].

use std::collections::HashSet;

use serde_json::Value;

use crate::transport::Transport;
use crate::types::{
    Implementation, InitializeParams, InitializeResult, McpError, McpResult, ToolCallParams,
    ToolCallResult, ToolDefinition, ToolListParams, ToolListResult, INITIALIZED,
};

use super::negotiation::NegotiatedServer;

/// An initialized session with one tool server.
pub struct McpClient<T: Transport> {
    transport: T,
    server: NegotiatedServer,
}

impl<T: Transport> McpClient<T> {
    /// Run the initialize handshake. On failure the transport is closed
    /// before the error is returned.
    pub async fn connect(mut transport: T, client_info: Implementation) -> McpResult<Self> {
        match handshake(&mut transport, client_info).await {
            Ok(server) => Ok(Self { transport, server }),
            Err(e) => {
                if let Err(close_err) = transport.close().await {
                    tracing::warn!("Failed to close transport after handshake error: {close_err}");
                }
                Err(e)
            }
        }
    }

    pub fn server(&self) -> &NegotiatedServer {
        &self.server
    }

    /// List every tool, following pagination cursors.
    ///
    /// A cursor the server already handed out is an error.
    pub async fn list_tools(&mut self) -> McpResult<Vec<ToolDefinition>> {
        let mut tools = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = None;

        loop {
            let params = serde_json::to_value(ToolListParams { cursor })?;
            let page: ToolListResult =
                serde_json::from_value(self.transport.request("tools/list", Some(params)).await?)?;
            tools.extend(page.tools);

            match page.next_cursor {
                Some(next) if !next.is_empty() => {
                    if !seen.insert(next.clone()) {
                        return Err(McpError::InvalidResponse(format!(
                            "tools/list repeated cursor '{next}'"
                        )));
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        tracing::debug!("Server lists {} tools", tools.len());
        Ok(tools)
    }

    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> McpResult<ToolCallResult> {
        let params = serde_json::to_value(ToolCallParams {
            name: name.to_string(),
            arguments: Some(arguments),
        })?;
        let result = self.transport.request("tools/call", Some(params)).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// End the session and release the transport.
    pub async fn close(mut self) -> McpResult<()> {
        self.transport.close().await
    }
}

async fn handshake<T: Transport>(
    transport: &mut T,
    client_info: Implementation,
) -> McpResult<NegotiatedServer> {
    let params = serde_json::to_value(InitializeParams::new(client_info))?;
    let result: InitializeResult =
        serde_json::from_value(transport.request("initialize", Some(params)).await?)?;
    let server = NegotiatedServer::negotiate(result)?;
    transport.notify(INITIALIZED, None).await?;
    Ok(server)
}
