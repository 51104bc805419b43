//! JSON data input

use serde_json::{Map, Value};
use std::path::PathBuf;

use tabmodel_core::{encode_field_name, Row, DEFAULT_SPECIAL_CHARS};

use crate::input::{DataInput, InputError, InputSource};

/// Rows from a JSON document
///
/// A top-level array yields one row per object. A top-level object yields
/// the objects of the array stored under `input_nodes`, or under its first
/// array-valued property when no node is configured; an object without any
/// array is a single row.
#[derive(Debug, Clone)]
pub struct JsonInput {
    source: InputSource,
    input_nodes: Option<String>,
    special_chars: Vec<char>,
}

impl JsonInput {
    pub fn from_json(text: impl Into<String>) -> Self {
        Self::new(InputSource::Text(text.into()))
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(InputSource::File(path.into()))
    }

    fn new(source: InputSource) -> Self {
        Self {
            source,
            input_nodes: None,
            special_chars: DEFAULT_SPECIAL_CHARS.to_vec(),
        }
    }

    /// Property holding the row array
    pub fn with_input_nodes(mut self, node: impl Into<String>) -> Self {
        self.input_nodes = Some(node.into());
        self
    }

    pub fn with_special_chars(mut self, chars: Vec<char>) -> Self {
        self.special_chars = chars;
        self
    }

    fn select_rows<'v>(&self, document: &'v Value) -> Result<Vec<&'v Value>, InputError> {
        match document {
            Value::Array(items) => Ok(items.iter().collect()),
            Value::Object(map) => match &self.input_nodes {
                Some(node) => match map.get(node) {
                    Some(Value::Array(items)) => Ok(items.iter().collect()),
                    _ => Err(InputError::MissingNode(node.clone())),
                },
                None => Ok(map
                    .values()
                    .find_map(|v| v.as_array())
                    .map(|items| items.iter().collect())
                    .unwrap_or_else(|| vec![document])),
            },
            other => Err(InputError::InvalidShape(format!(
                "expected an array or an object, found {}",
                kind_of(other)
            ))),
        }
    }

    fn to_row(&self, object: &Map<String, Value>) -> Row {
        let mut row = Row::new();
        for (key, value) in object {
            let text = match value {
                Value::Null => String::new(),
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => continue,
            };
            row.insert(encode_field_name(key, &self.special_chars), text);
        }
        row
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl DataInput for JsonInput {
    fn name(&self) -> &str {
        "JsonInput"
    }

    fn special_chars(&self) -> &[char] {
        &self.special_chars
    }

    fn rows(&self) -> Result<Vec<Row>, InputError> {
        let text = self.source.read()?;
        let document: Value = serde_json::from_str(&text).map_err(|e| InputError::Parse(e.to_string()))?;

        let mut rows = Vec::new();
        for item in self.select_rows(&document)? {
            match item {
                Value::Object(object) => rows.push(self.to_row(object)),
                other => tracing::debug!(kind = kind_of(other), "skipping non-object JSON row"),
            }
        }

        tracing::debug!(rows = rows.len(), "read JSON input");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn array_of_objects() {
        let input = JsonInput::from_json(
            r##"[{"NAME": "Ann", "AGE": 31, "ACTIVE": true, "NOTE": null, "TAGS": ["a"]},
                 {"NAME": "Bob", "#ID": "7"}]"##,
        );
        let rows = input.rows().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].attribute("AGE"), Some("31"));
        assert_eq!(rows[0].attribute("ACTIVE"), Some("true"));
        assert_eq!(rows[0].attribute("NOTE"), Some(""));
        assert_eq!(rows[0].attribute("TAGS"), None);
        assert_eq!(rows[1].attribute("_x0023_ID"), Some("7"));
    }

    #[test]
    fn object_selects_row_array() {
        let json = r#"{"meta": {"v": 1}, "sales": [{"A": "1"}], "other": [{"B": "2"}, {"B": "3"}]}"#;

        let first = JsonInput::from_json(json).rows().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].attribute("A"), Some("1"));

        let named = JsonInput::from_json(json).with_input_nodes("other").rows().unwrap();
        assert_eq!(named.len(), 2);

        let missing = JsonInput::from_json(json).with_input_nodes("nope").rows();
        assert!(matches!(missing, Err(InputError::MissingNode(_))));
    }

    #[test]
    fn single_object_is_one_row() {
        let rows = JsonInput::from_json(r#"{"A": "1", "B": 2}"#).rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].attribute("B"), Some("2"));
    }

    #[test]
    fn invalid_documents() {
        assert!(matches!(JsonInput::from_json("[").rows(), Err(InputError::Parse(_))));
        assert!(matches!(JsonInput::from_json("42").rows(), Err(InputError::InvalidShape(_))));
        assert!(matches!(
            JsonInput::from_file("/definitely/not/here.json").rows(),
            Err(InputError::Io { .. })
        ));
    }
}
