//! Normalization of free-form tool output into [`SearchRecord`]s.
//!
//! Search tools disagree on shape: some wrap results in `{"organic": [...]}`,
//! some return a bare array, some a single object. Field names drift too
//! (`url` vs `link`, `description` vs `snippet`).

use serde_json::{Map, Value};

use crate::types::{BridgeError, BridgeResult, SearchRecord};

const WRAPPER_KEYS: &[&str] = &["organic", "results", "data"];
const TITLE_KEYS: &[&str] = &["title", "name"];
const LINK_KEYS: &[&str] = &["link", "url", "href"];
const SNIPPET_KEYS: &[&str] = &["snippet", "description", "body", "content"];

/// Parse the text a search tool returned.
///
/// Empty text and a literal `[]` mean "no results". Invalid JSON is a
/// [`BridgeError::Parse`].
pub fn parse_tool_payload(text: &str) -> BridgeResult<Vec<SearchRecord>> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "[]" {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| BridgeError::Parse(format!("tool payload is not JSON: {e}")))?;

    Ok(records_from_value(&value))
}

/// Flatten any accepted payload shape into records.
pub fn records_from_value(value: &Value) -> Vec<SearchRecord> {
    match value {
        Value::Array(items) => items.iter().filter_map(record_from_item).collect(),
        Value::Object(obj) => match unwrap_list(obj) {
            Some(items) => items.iter().filter_map(record_from_item).collect(),
            None => record_from_object(obj).into_iter().collect(),
        },
        _ => Vec::new(),
    }
}

fn unwrap_list(obj: &Map<String, Value>) -> Option<&Vec<Value>> {
    WRAPPER_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_array))
}

fn record_from_item(item: &Value) -> Option<SearchRecord> {
    item.as_object().and_then(record_from_object)
}

fn record_from_object(obj: &Map<String, Value>) -> Option<SearchRecord> {
    let record = SearchRecord {
        title: first_text(obj, TITLE_KEYS),
        link: first_text(obj, LINK_KEYS),
        snippet: first_text(obj, SNIPPET_KEYS),
    };

    if record.is_blank() {
        None
    } else {
        Some(record)
    }
}

fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        _ => None,
    })
}
