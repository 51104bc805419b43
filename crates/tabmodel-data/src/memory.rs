//! In-memory data input
//!
//! Useful for tests and for callers that already hold their records.

use serde::Serialize;
use serde_json::Value;

use tabmodel_core::{encode_field_name, Row, DEFAULT_SPECIAL_CHARS};

use crate::input::{DataInput, InputError};

#[derive(Debug, Clone, Default)]
pub struct MemoryInput {
    rows: Vec<Row>,
}

impl MemoryInput {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build rows from serializable records
    ///
    /// Each item must serialize to a JSON object; scalar members become
    /// attributes, nested values are dropped.
    pub fn from_serializable<T: Serialize>(items: &[T]) -> Result<Self, InputError> {
        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            let value = serde_json::to_value(item).map_err(|e| InputError::Parse(e.to_string()))?;
            let Value::Object(object) = value else {
                return Err(InputError::InvalidShape("records must serialize to objects".into()));
            };

            let mut row = Row::new();
            for (key, value) in object {
                let text = match value {
                    Value::Null => String::new(),
                    Value::String(s) => s,
                    Value::Bool(b) => b.to_string(),
                    Value::Number(n) => n.to_string(),
                    Value::Array(_) | Value::Object(_) => continue,
                };
                row.insert(encode_field_name(&key, &DEFAULT_SPECIAL_CHARS), text);
            }
            rows.push(row);
        }
        Ok(Self { rows })
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }
}

impl DataInput for MemoryInput {
    fn name(&self) -> &str {
        "MemoryInput"
    }

    fn special_chars(&self) -> &[char] {
        &DEFAULT_SPECIAL_CHARS
    }

    fn rows(&self) -> Result<Vec<Row>, InputError> {
        Ok(self.rows.clone())
    }
}
