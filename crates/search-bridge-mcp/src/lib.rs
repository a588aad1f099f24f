//! search-bridge MCP crate: tool-server client, HTTP front end, and the
//! MCP-backed fallback provider.

pub mod config;
pub mod http;
pub mod protocol;
pub mod provider;
pub mod transport;
pub mod types;

pub use config::{BridgeConfig, ConfigOverrides};
pub use protocol::McpClient;
pub use provider::McpSearchProvider;
pub use transport::{ChildProcessTransport, LineTransport, Transport};

use search_bridge::{BridgeResult, DuckDuckGoProvider, SearchBridge};

/// Assemble the two-tier bridge described by `config`.
pub fn build_bridge(config: &BridgeConfig) -> BridgeResult<SearchBridge> {
    let primary = DuckDuckGoProvider::new(config.safe_search)?;
    let secondary = McpSearchProvider::from_config(config);
    Ok(SearchBridge::new(primary, secondary))
}
