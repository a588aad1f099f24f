//! Search provider backed by an MCP tool server subprocess (secondary tier).

use async_trait::async_trait;
use serde_json::json;

use search_bridge::{parse_tool_payload, BridgeResult, SearchProvider, SearchRecord};

use crate::config::BridgeConfig;
use crate::protocol::McpClient;
use crate::transport::{ChildProcessTransport, Transport};
use crate::types::{
    Implementation, McpError, McpResult, ToolCallResult, ToolDefinition,
};

/// Name of the tool that performs web search.
pub const SEARCH_TOOL: &str = "search";

/// Launches the tool server per query; nothing is kept between calls.
#[derive(Debug, Clone)]
pub struct McpSearchProvider {
    command: String,
    args: Vec<String>,
}

impl McpSearchProvider {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.tool_command.clone(), config.tool_args.clone())
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn open(&self) -> McpResult<McpClient<ChildProcessTransport>> {
        let transport = ChildProcessTransport::spawn(&self.command, &self.args)?;
        McpClient::connect(transport, Implementation::bridge_client()).await
    }

    /// List the server's tools.
    pub async fn list_tools(&self) -> McpResult<Vec<ToolDefinition>> {
        let mut client = self.open().await?;
        let tools = client.list_tools().await;
        close_quietly(client).await;
        tools
    }

    /// Call the search tool once and return its raw result.
    pub async fn probe(&self, query: &str, count: usize) -> McpResult<ToolCallResult> {
        let mut client = self.open().await?;
        let result = client.call_tool(SEARCH_TOOL, search_arguments(query, count)).await;
        close_quietly(client).await;
        result
    }
}

#[async_trait]
impl SearchProvider for McpSearchProvider {
    fn name(&self) -> &str {
        "mcp"
    }

    async fn search(&self, query: &str, limit: usize) -> BridgeResult<Vec<SearchRecord>> {
        let client = self.open().await?;
        let records = search_with_client(client, SEARCH_TOOL, query, limit).await?;
        tracing::info!("Found {} results via MCP", records.len());
        Ok(records)
    }
}

/// Run one search over an already-initialized client, then close it.
///
/// The client is closed whether or not the search succeeded.
pub async fn search_with_client<T: Transport>(
    mut client: McpClient<T>,
    tool: &str,
    query: &str,
    limit: usize,
) -> BridgeResult<Vec<SearchRecord>> {
    let outcome = run_search(&mut client, tool, query, limit).await;
    close_quietly(client).await;
    outcome
}

async fn run_search<T: Transport>(
    client: &mut McpClient<T>,
    tool: &str,
    query: &str,
    limit: usize,
) -> BridgeResult<Vec<SearchRecord>> {
    let tools = client.list_tools().await?;
    let name = resolve_tool(&tools, tool);

    let result = client.call_tool(name, search_arguments(query, limit)).await?;

    if result.is_error() {
        return Err(McpError::ToolFailed {
            name: name.to_string(),
            message: result.first_text().unwrap_or("no message").to_string(),
        }
        .into());
    }

    match result.first_text() {
        Some(text) => parse_tool_payload(text),
        None => {
            tracing::debug!("Tool '{name}' returned no text content");
            Ok(Vec::new())
        }
    }
}

/// Pick the advertised tool named `wanted`; call it by that name regardless.
fn resolve_tool<'a>(tools: &'a [ToolDefinition], wanted: &'a str) -> &'a str {
    match tools.iter().find(|t| t.name == wanted) {
        Some(tool) => tool.name.as_str(),
        None => {
            tracing::warn!("Tool server does not list '{wanted}'; calling it anyway");
            wanted
        }
    }
}

fn search_arguments(query: &str, count: usize) -> serde_json::Value {
    json!({ "query": query, "count": count })
}

async fn close_quietly<T: Transport>(client: McpClient<T>) {
    if let Err(e) = client.close().await {
        tracing::warn!("Failed to close tool server: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let provider = McpSearchProvider::new("npx", vec!["-y".into(), "pskill9/web-search".into()]);
        assert_eq!(provider.command_line(), "npx -y pskill9/web-search");
        assert_eq!(provider.name(), "mcp");
    }

    #[test]
    fn test_resolve_tool_falls_back_to_wanted() {
        let tools: Vec<ToolDefinition> = serde_json::from_value(json!([
            {"name": "fetch"},
            {"name": "search"}
        ]))
        .unwrap();
        assert_eq!(resolve_tool(&tools, "search"), "search");
        assert_eq!(resolve_tool(&tools[..1], "search"), "search");
    }

    #[test]
    fn test_search_arguments_shape() {
        assert_eq!(
            search_arguments("AI", 20),
            json!({"query": "AI", "count": 20})
        );
    }

    #[tokio::test]
    async fn test_missing_command_is_provider_error() {
        let provider = McpSearchProvider::new("definitely-not-a-real-binary-4821", vec![]);
        let err = provider.search("rust", 20).await.unwrap_err();
        assert!(err.to_string().contains("definitely-not-a-real-binary-4821"));
    }

    /// A shell script that answers one initialize, list and call in order.
    #[cfg(unix)]
    const SCRIPTED_SERVER: &str = r##"
read -r line
printf '%s\n' '{"jsonrpc":"2.0","id":1,"result":{"protocolVersion":"2024-11-05","capabilities":{"tools":{}},"serverInfo":{"name":"sh-search","version":"0"}}}'
read -r line
echo "npm warn exec installing package"
read -r line
printf '%s\n' '{"jsonrpc":"2.0","id":2,"result":{"tools":[{"name":"search","inputSchema":{"type":"object"}}]}}'
read -r line
case "$line" in
  *'"query":"rust"'*)
    printf '%s\n' '{"jsonrpc":"2.0","id":3,"result":{"content":[{"type":"text","text":"[{\"title\":\"Rust\",\"link\":\"https://rust-lang.org\",\"snippet\":\"A language\"}]"}]}}' ;;
  *)
    printf '%s\n' '{"jsonrpc":"2.0","id":3,"result":{"content":[{"type":"text","text":"[]"}]}}' ;;
esac
"##;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_search_against_subprocess() {
        let provider = McpSearchProvider::new("sh", vec!["-c".into(), SCRIPTED_SERVER.into()]);
        let records = provider.search("rust", 20).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title.as_deref(), Some("Rust"));
        assert_eq!(records[0].link.as_deref(), Some("https://rust-lang.org"));
        assert_eq!(records[0].snippet.as_deref(), Some("A language"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_list_tools_against_subprocess() {
        let provider = McpSearchProvider::new("sh", vec!["-c".into(), SCRIPTED_SERVER.into()]);
        let tools = provider.list_tools().await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, SEARCH_TOOL);
    }
}
