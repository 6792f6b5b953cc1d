//! Tests for output formatting

use super::*;
use crate::types::{OutputFormat, Record};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

fn records(value: Value) -> Vec<Record> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect()
}

#[test]
fn test_infer_columns_common_keys_first() {
    let items = records(json!([
        {"zeta": 1, "name": "A", "id": 1},
        {"alpha": 2, "updated_at": "x", "id": 2}
    ]));
    assert_eq!(
        infer_columns(&items),
        vec!["id", "name", "updated_at", "alpha", "zeta"]
    );
}

#[test]
fn test_table_listing() {
    let items = records(json!([
        {"id": 1, "name": "Alpha", "bookmarked": true},
        {"id": 22, "name": "B", "description": null}
    ]));

    let expected = [
        "id | name  | description | bookmarked",
        "-------------------------------------",
        "1  | Alpha | N/A         | true      ",
        "22 | B     | N/A         | N/A       ",
    ]
    .join("\n");

    assert_eq!(
        render_records(&items, OutputFormat::Table).unwrap(),
        expected
    );
}

#[test]
fn test_table_single_record() {
    let value = json!({
        "id": 7,
        "name": "Alpha",
        "purpose": null,
        "dock": [{"id": 1}]
    });

    let expected = "\
id       7
name     Alpha
purpose  N/A
dock     [
           {
             \"id\": 1
           }
         ]";

    assert_eq!(render(&value, OutputFormat::Table).unwrap(), expected);
}

#[test]
fn test_plain_listing() {
    let items = records(json!([
        {"name": "Alpha", "id": 1, "status": null},
        {"id": 2, "creator": {"id": 9}}
    ]));

    let expected = "\
id: 1
name: Alpha

id: 2
creator: {
    \"id\": 9
  }";

    assert_eq!(
        render_records(&items, OutputFormat::Plain).unwrap(),
        expected
    );
}

#[test]
fn test_plain_single_record_keeps_key_order() {
    let value = json!({"zeta": "z", "id": 1, "gone": null, "ok": false});
    assert_eq!(
        render(&value, OutputFormat::Plain).unwrap(),
        "zeta: z\nid: 1\nok: false"
    );
}

#[test]
fn test_json_preserves_key_order() {
    let value = json!({"name": "Alpha", "id": 1});
    assert_eq!(
        render(&value, OutputFormat::Json).unwrap(),
        "{\n  \"name\": \"Alpha\",\n  \"id\": 1\n}"
    );
}

#[test_case(OutputFormat::Table, "No items found." ; "table")]
#[test_case(OutputFormat::Plain, "No items found." ; "plain")]
#[test_case(OutputFormat::Json, "[]" ; "json")]
fn test_empty_listing(format: OutputFormat, expected: &str) {
    assert_eq!(render_records(&[], format).unwrap(), expected);
    assert_eq!(render(&json!([]), format).unwrap(), expected);
}

#[test_case(OutputFormat::Table, "No data available." ; "table")]
#[test_case(OutputFormat::Plain, "No data available." ; "plain")]
#[test_case(OutputFormat::Json, "{}" ; "json")]
fn test_empty_record(format: OutputFormat, expected: &str) {
    assert_eq!(render(&json!({}), format).unwrap(), expected);
}

#[test]
fn test_scalar_array() {
    assert_eq!(
        render(&json!(["a", 2, true]), OutputFormat::Plain).unwrap(),
        "a\n2\ntrue"
    );
}

#[test]
fn test_renderer_does_not_mutate() {
    let items = records(json!([{"id": 1, "name": "Alpha"}]));
    let before = items.clone();

    let rendered = crate::pagination::Renderer::render(&RecordRenderer, &items, OutputFormat::Table)
        .unwrap();

    assert!(rendered.starts_with("id | name"));
    assert_eq!(items, before);
}
