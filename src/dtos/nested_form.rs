// src/dtos/nested_form.rs
//! Decoding of bracket-notation form fields into a JSON tree.
//!
//! HTML forms can only submit flat `name=value` pairs. The dashboard encodes
//! its repeated sections with bracketed names, e.g.
//!
//! ```text
//! experience[0][title]=Engineer
//! experience[0][description][]=Built things
//! skills[]=Rust
//! ```
//!
//! [`decode`] turns such pairs into a [`serde_json::Value`] that can then be
//! deserialized into a typed request. Objects whose keys are all numeric become
//! arrays ordered by index, with gaps compacted. An empty segment (`[]`)
//! appends, and a name repeated without brackets collects into an array.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// Deepest bracket nesting accepted for one field name.
const MAX_DEPTH: usize = 5;

static KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^\[\]]+)((?:\[[^\[\]]*\])*)$").expect("valid key regex"));
static SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]]*)\]").expect("valid segment regex"));

#[derive(Debug, Error)]
pub enum FormError {
    #[error("form field `{0}` is nested too deeply")]
    TooDeep(String),
    #[error("form field name is empty")]
    EmptyName,
    #[error("form data has an unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("multipart error: {0}")]
    Multipart(String),
    #[error("form field `{0}` is not valid UTF-8")]
    Encoding(String),
}

/// Splits `a[b][]` into `["a", "b", ""]`. Names that do not follow the bracket
/// grammar are taken literally as a single segment.
pub fn parse_key(key: &str) -> Result<Vec<String>, FormError> {
    if key.is_empty() {
        return Err(FormError::EmptyName);
    }

    let Some(caps) = KEY_RE.captures(key) else {
        return Ok(vec![key.to_string()]);
    };

    let mut path = vec![caps[1].to_string()];
    for seg in SEGMENT_RE.captures_iter(&caps[2]) {
        path.push(seg[1].to_string());
    }

    if path.len() > MAX_DEPTH + 1 {
        return Err(FormError::TooDeep(key.to_string()));
    }
    Ok(path)
}

/// Decodes flat form pairs into a nested JSON value (always an object at the root).
pub fn decode<I, K, V>(pairs: I) -> Result<Value, FormError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut root = Map::new();
    for (key, value) in pairs {
        let path = parse_key(key.as_ref())?;
        insert(&mut root, &path, value.into());
    }
    Ok(Value::Object(
        root.into_iter().map(|(k, v)| (k, finalize(v))).collect(),
    ))
}

/// Key an `[]` append lands on: one past the highest index already present.
fn next_index(map: &Map<String, Value>) -> String {
    map.keys()
        .filter_map(|k| k.parse::<usize>().ok())
        .max()
        .map_or(0, |i| i + 1)
        .to_string()
}

fn insert(map: &mut Map<String, Value>, path: &[String], value: String) {
    let head = if path[0].is_empty() {
        next_index(map)
    } else {
        path[0].clone()
    };
    let rest = &path[1..];

    if rest.is_empty() {
        match map.get_mut(&head) {
            None => {
                map.insert(head, Value::String(value));
            }
            Some(Value::Array(items)) => items.push(Value::String(value)),
            Some(Value::Object(child)) => {
                let idx = next_index(child);
                child.insert(idx, Value::String(value));
            }
            Some(existing) => {
                let prev = existing.take();
                *existing = Value::Array(vec![prev, Value::String(value)]);
            }
        }
        return;
    }

    let child = map
        .entry(head)
        .or_insert_with(|| Value::Object(Map::new()));
    if !child.is_object() {
        *child = Value::Object(indexed(child.take()));
    }
    if let Value::Object(child) = child {
        insert(child, rest, value);
    }
}

/// Re-keys a scalar or array by position so it can take bracketed children.
fn indexed(value: Value) -> Map<String, Value> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, v)| (i.to_string(), v))
        .collect()
}

fn finalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let all_indices = !map.is_empty() && map.keys().all(|k| k.parse::<usize>().is_ok());
            if all_indices {
                let mut entries: Vec<(usize, Value)> = map
                    .into_iter()
                    .filter_map(|(k, v)| k.parse::<usize>().ok().map(|i| (i, v)))
                    .collect();
                entries.sort_by_key(|(i, _)| *i);
                Value::Array(entries.into_iter().map(|(_, v)| finalize(v)).collect())
            } else {
                Value::Object(map.into_iter().map(|(k, v)| (k, finalize(v))).collect())
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(finalize).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_bracket_segments() {
        assert_eq!(parse_key("heroTitle").unwrap(), vec!["heroTitle"]);
        assert_eq!(
            parse_key("experience[0][description][]").unwrap(),
            vec!["experience", "0", "description", ""]
        );
        assert_eq!(parse_key("odd[name").unwrap(), vec!["odd[name"]);
        assert!(matches!(parse_key(""), Err(FormError::EmptyName)));
        assert!(matches!(
            parse_key("a[b][c][d][e][f][g]"),
            Err(FormError::TooDeep(_))
        ));
    }

    #[test]
    fn decodes_indexed_objects_in_numeric_order() {
        let value = decode(vec![
            ("experience[10][title]", "Later"),
            ("experience[2][title]", "Earlier"),
            ("experience[2][location]", "Remote"),
        ])
        .unwrap();

        assert_eq!(
            value,
            json!({
                "experience": [
                    {"title": "Earlier", "location": "Remote"},
                    {"title": "Later"}
                ]
            })
        );
    }

    #[test]
    fn empty_brackets_append() {
        let value = decode(vec![
            ("skills[]", "Rust"),
            ("skills[]", "SQL"),
            ("experience[0][description][]", "one"),
            ("experience[0][description][]", "two"),
        ])
        .unwrap();

        assert_eq!(value["skills"], json!(["Rust", "SQL"]));
        assert_eq!(value["experience"][0]["description"], json!(["one", "two"]));
    }

    #[test]
    fn append_follows_explicit_indices() {
        let value = decode(vec![
            ("skills[1]", "Rust"),
            ("skills[]", "SQL"),
            ("experience[3][title]", "Dev"),
            ("experience[3][description][]", "one"),
            ("experience[][title]", "Lead"),
        ])
        .unwrap();

        assert_eq!(value["skills"], json!(["Rust", "SQL"]));
        assert_eq!(
            value["experience"],
            json!([{"title": "Dev", "description": ["one"]}, {"title": "Lead"}])
        );
    }

    #[test]
    fn numeric_root_names_stay_an_object() {
        let value = decode(vec![("0", "zero"), ("1", "one")]).unwrap();
        assert_eq!(value, json!({"0": "zero", "1": "one"}));
    }

    #[test]
    fn repeated_plain_names_collect() {
        let value = decode(vec![("skills", "Rust"), ("skills", "Go"), ("heroName", "Jane")]).unwrap();
        assert_eq!(value, json!({"skills": ["Rust", "Go"], "heroName": "Jane"}));
    }

    #[test]
    fn no_pairs_decodes_to_empty_object() {
        let value = decode(Vec::<(&str, &str)>::new()).unwrap();
        assert_eq!(value, json!({}));
    }
}
