//! search-bridge: core library for forwarding search queries to a scraping
//! provider with a tool-protocol fallback.

pub mod bridge;
pub mod duckduckgo;
pub mod normalize;
pub mod provider;
pub mod types;

pub use bridge::{BridgeOutcome, SearchBridge, Tier};
pub use duckduckgo::DuckDuckGoProvider;
pub use normalize::parse_tool_payload;
pub use provider::SearchProvider;
pub use types::*;
