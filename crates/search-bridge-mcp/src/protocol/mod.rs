//! MCP protocol handling: client handshake and tool calls.

pub mod client;
pub mod negotiation;

pub use client::McpClient;
pub use negotiation::NegotiatedServer;
