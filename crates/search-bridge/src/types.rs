//! Core data types for search results and bridge errors.

use serde::{Deserialize, Serialize};

/// Maximum number of records returned per query, and the count requested
/// from the tool provider.
pub const MAX_RESULTS: usize = 20;

/// A normalized search result.
///
/// All three fields are always present in the serialized form; a missing
/// value is written as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
}

impl SearchRecord {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            link: Some(link.into()),
            snippet: Some(snippet.into()),
        }
    }

    /// True when none of the fields carry a value.
    pub fn is_blank(&self) -> bool {
        self.title.is_none() && self.link.is_none() && self.snippet.is_none()
    }
}

/// Errors raised by a single provider tier.
#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        BridgeError::Parse(e.to_string())
    }
}

/// Convenience result type.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_all_fields() {
        let record = SearchRecord {
            title: Some("Rust".into()),
            link: None,
            snippet: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["title"], "Rust");
        assert!(obj["link"].is_null());
        assert!(obj["snippet"].is_null());
    }

    #[test]
    fn test_blank_record() {
        assert!(SearchRecord::default().is_blank());
        assert!(!SearchRecord::new("a", "b", "c").is_blank());
    }

    #[test]
    fn test_error_display() {
        let err = BridgeError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
        let err: BridgeError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("Parse error:"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BridgeError>();
    }
}
