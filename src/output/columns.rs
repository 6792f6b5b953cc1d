//! Column inference for record listings
//!
//! Records in one listing rarely share exactly the same keys, so the
//! columns are the union of every record's keys.

use crate::types::{JsonValue, Record};
use std::collections::BTreeSet;

/// Keys shown first, in this order, when present
pub const COMMON_KEYS: [&str; 7] = [
    "id",
    "name",
    "description",
    "content",
    "status",
    "created_at",
    "updated_at",
];

/// Union of keys across `items`: common keys first, then the rest sorted
pub fn infer_columns(items: &[Record]) -> Vec<String> {
    let all: BTreeSet<&str> = items
        .iter()
        .flat_map(|item| item.keys().map(String::as_str))
        .collect();

    let mut columns: Vec<String> = COMMON_KEYS
        .iter()
        .filter(|key| all.contains(*key))
        .map(|key| (*key).to_string())
        .collect();
    columns.extend(
        all.iter()
            .filter(|key| !COMMON_KEYS.contains(key))
            .map(|key| (*key).to_string()),
    );
    columns
}

/// A scalar as display text: strings unquoted, everything else as JSON
pub fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Display width of a cell
pub fn width(text: &str) -> usize {
    text.chars().count()
}

/// Pretty JSON for nested values, continuation lines prefixed with `indent`
pub fn nested_lines(value: &JsonValue, indent: usize) -> Vec<String> {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    let pad = " ".repeat(indent);
    pretty
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect()
}

/// Whether a value renders over several lines
pub fn is_nested(value: &JsonValue) -> bool {
    matches!(value, JsonValue::Object(_) | JsonValue::Array(_))
}
