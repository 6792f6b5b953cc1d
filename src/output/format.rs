//! Output formatting
//!
//! Renders API responses as pretty JSON, aligned tables, or `key: value`
//! lines.

use super::columns::{infer_columns, is_nested, nested_lines, scalar_text, width};
use crate::error::Result;
use crate::pagination::Renderer;
use crate::types::{JsonValue, OutputFormat, Record};

const NO_ITEMS: &str = "No items found.";
const NO_DATA: &str = "No data available.";
const MISSING: &str = "N/A";

/// Render any response body
///
/// Objects render as a single record and arrays as a listing. Arrays that
/// hold scalars print one value per line outside JSON output.
pub fn render(value: &JsonValue, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(value)?);
    }
    match value {
        JsonValue::Object(record) => render_record(record, format),
        JsonValue::Array(values) if values.iter().all(JsonValue::is_object) => {
            let records: Vec<Record> = values
                .iter()
                .filter_map(|v| v.as_object().cloned())
                .collect();
            render_records(&records, format)
        }
        JsonValue::Array(values) => Ok(values
            .iter()
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join("\n")),
        other => Ok(scalar_text(other)),
    }
}

/// Render a listing
pub fn render_records(items: &[Record], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        _ if items.is_empty() => Ok(NO_ITEMS.to_string()),
        OutputFormat::Table => Ok(table(items)),
        OutputFormat::Plain => Ok(plain_list(items)),
    }
}

/// Render one record
pub fn render_record(record: &Record, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        _ if record.is_empty() => Ok(NO_DATA.to_string()),
        OutputFormat::Table => Ok(key_value_table(record)),
        OutputFormat::Plain => Ok(plain_lines(record, record.keys())),
    }
}

/// [`Renderer`] backed by [`render_records`]
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordRenderer;

impl Renderer for RecordRenderer {
    fn render(&self, items: &[Record], format: OutputFormat) -> Result<String> {
        render_records(items, format)
    }
}

// ============================================================================
// Table
// ============================================================================

fn cell(item: &Record, key: &str) -> String {
    match item.get(key) {
        None | Some(JsonValue::Null) => MISSING.to_string(),
        Some(value) => scalar_text(value),
    }
}

fn table(items: &[Record]) -> String {
    let columns = infer_columns(items);
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| columns.iter().map(|key| cell(item, key)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, key)| {
            rows.iter()
                .map(|row| width(&row[i]))
                .fold(width(key), usize::max)
        })
        .collect();

    let join = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(text, w)| pad(text, *w))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let header = join(&columns);
    let rule = "-".repeat(width(&header));
    let mut lines = vec![header, rule];
    lines.extend(rows.iter().map(|row| join(row)));
    lines.join("\n")
}

fn key_value_table(record: &Record) -> String {
    let key_width = record.keys().map(|k| width(k)).max().unwrap_or(0);
    let mut lines = Vec::new();

    for (key, value) in record {
        let label = pad(key, key_width);
        match value {
            JsonValue::Null => lines.push(format!("{label}  {MISSING}")),
            v if is_nested(v) => {
                let mut nested = nested_lines(v, key_width + 2).into_iter();
                let first = nested.next().unwrap_or_default();
                lines.push(format!("{label}  {first}"));
                lines.extend(nested);
            }
            v => lines.push(format!("{label}  {}", scalar_text(v))),
        }
    }

    lines.join("\n")
}

fn pad(text: &str, to: usize) -> String {
    let fill = to.saturating_sub(width(text));
    format!("{text}{}", " ".repeat(fill))
}

// ============================================================================
// Plain
// ============================================================================

fn plain_list(items: &[Record]) -> String {
    let columns = infer_columns(items);
    items
        .iter()
        .map(|item| plain_lines(item, columns.iter()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `key: value` lines for the given keys; null and missing values are
/// left out
fn plain_lines<'k>(record: &Record, keys: impl Iterator<Item = &'k String>) -> String {
    let mut lines = Vec::new();
    for key in keys {
        match record.get(key) {
            None | Some(JsonValue::Null) => {}
            Some(value) if is_nested(value) => {
                let mut nested = nested_lines(value, 2).into_iter();
                let first = nested.next().unwrap_or_default();
                lines.push(format!("{key}: {first}"));
                lines.extend(nested);
            }
            Some(value) => lines.push(format!("{key}: {}", scalar_text(value))),
        }
    }
    lines.join("\n")
}
