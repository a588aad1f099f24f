//! Configuration loading and resolution.
//!
//! Every setting resolves as: explicit flag, then environment variable,
//! then built-in default.

pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_TOOL_COMMAND: &str = "npx";
pub const DEFAULT_TOOL_ARGS: &[&str] = &["-y", "pskill9/web-search"];

pub const ENV_ADDR: &str = "SEARCH_BRIDGE_ADDR";
pub const ENV_TOOL_COMMAND: &str = "SEARCH_BRIDGE_TOOL_COMMAND";
pub const ENV_TOOL_ARGS: &str = "SEARCH_BRIDGE_TOOL_ARGS";
pub const ENV_SAFE_SEARCH: &str = "SEARCH_BRIDGE_SAFE_SEARCH";

/// Resolved bridge settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub addr: String,
    pub tool_command: String,
    pub tool_args: Vec<String>,
    pub safe_search: bool,
}

/// Values given on the command line, if any.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub addr: Option<String>,
    pub tool_command: Option<String>,
    pub tool_args: Option<String>,
    pub safe_search: Option<bool>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            tool_command: DEFAULT_TOOL_COMMAND.to_string(),
            tool_args: DEFAULT_TOOL_ARGS.iter().map(|s| s.to_string()).collect(),
            safe_search: true,
        }
    }
}

impl BridgeConfig {
    /// Resolve against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary variable lookup.
    pub fn resolve_with(overrides: ConfigOverrides, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let addr = overrides
            .addr
            .or_else(|| env(ENV_ADDR))
            .unwrap_or(defaults.addr);

        let tool_command = overrides
            .tool_command
            .or_else(|| env(ENV_TOOL_COMMAND))
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(defaults.tool_command);

        let tool_args = overrides
            .tool_args
            .or_else(|| env(ENV_TOOL_ARGS))
            .map(|raw| split_args(&raw))
            .unwrap_or(defaults.tool_args);

        let safe_search = overrides
            .safe_search
            .or_else(|| env(ENV_SAFE_SEARCH).and_then(|v| parse_bool(&v)))
            .unwrap_or(defaults.safe_search);

        Self {
            addr,
            tool_command,
            tool_args,
            safe_search,
        }
    }
}

fn split_args(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            tracing::warn!("Ignoring unrecognized boolean '{other}' for {ENV_SAFE_SEARCH}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::resolve_with(ConfigOverrides::default(), env_of(&[]));
        assert_eq!(config.addr, "0.0.0.0:8000");
        assert_eq!(config.tool_command, "npx");
        assert_eq!(config.tool_args, vec!["-y", "pskill9/web-search"]);
        assert!(config.safe_search);
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = BridgeConfig::resolve_with(
            ConfigOverrides::default(),
            env_of(&[
                (ENV_ADDR, "127.0.0.1:9000"),
                (ENV_TOOL_COMMAND, "node"),
                (ENV_TOOL_ARGS, "  server.js   --stdio "),
                (ENV_SAFE_SEARCH, "off"),
            ]),
        );
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert_eq!(config.tool_command, "node");
        assert_eq!(config.tool_args, vec!["server.js", "--stdio"]);
        assert!(!config.safe_search);
    }

    #[test]
    fn test_flags_override_env() {
        let overrides = ConfigOverrides {
            addr: Some("127.0.0.1:1234".into()),
            tool_command: None,
            tool_args: Some("-y other/tool".into()),
            safe_search: Some(true),
        };
        let config = BridgeConfig::resolve_with(
            overrides,
            env_of(&[(ENV_ADDR, "0.0.0.0:1"), (ENV_SAFE_SEARCH, "false")]),
        );
        assert_eq!(config.addr, "127.0.0.1:1234");
        assert_eq!(config.tool_args, vec!["-y", "other/tool"]);
        assert!(config.safe_search);
    }

    #[test]
    fn test_blank_command_and_bad_bool_fall_back() {
        let config = BridgeConfig::resolve_with(
            ConfigOverrides::default(),
            env_of(&[(ENV_TOOL_COMMAND, "  "), (ENV_SAFE_SEARCH, "maybe")]),
        );
        assert_eq!(config.tool_command, "npx");
        assert!(config.safe_search);
    }
}
