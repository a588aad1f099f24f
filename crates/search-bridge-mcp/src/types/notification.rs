//! MCP notification types the client understands.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sent by the client once the initialize exchange succeeded.
pub const INITIALIZED: &str = "notifications/initialized";

/// Server log line forwarded over the protocol.
pub const LOG_MESSAGE: &str = "notifications/message";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMessageParams {
    pub level: LogLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logger: Option<String>,
    pub data: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}
