//! Model error types
//!
//! Every validating setter in the model reports the element, the attribute
//! and the rejected value so the message points straight at the offending
//! line of a model document.

/// Errors raised while building or querying the model graph
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid identifier: {element}.{attribute} = '{value}' (letters, digits, '_', '-' and '.' only, must not start with a digit)")]
    InvalidIdentifier {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("Invalid field name: {element}.{attribute} = '{value}' (letters, digits, spaces, '_', '-', '.', '#', '*' and '@' only)")]
    InvalidFieldName {
        element: String,
        attribute: String,
        value: String,
    },

    #[error("Invalid path: {attribute} = '{value}'")]
    InvalidPath { attribute: String, value: String },

    #[error("{element}.{attribute} must not be empty")]
    EmptyValue { element: String, attribute: String },

    #[error("{element}.{attribute} = {value} is out of range ({reason})")]
    OutOfRange {
        element: String,
        attribute: String,
        value: i64,
        reason: String,
    },

    #[error("Piece '{piece}' [{from}, {to}) is outside the {len} characters of '{reference}'")]
    PieceOutOfRange {
        piece: String,
        reference: String,
        from: usize,
        to: usize,
        len: usize,
    },

    #[error("The specified field '{0}' doesn't exist in the data source")]
    MissingAttribute(String),

    #[error("{kind} '{name}' not found in resources")]
    UnknownResource { kind: &'static str, name: String },

    #[error("Style inheritance cycle: {}", .0.join(" -> "))]
    StyleInheritanceCycle(Vec<String>),

    #[error("Invalid value '{value}' for filter '{key}': {reason}")]
    InvalidFilterValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read model: {0}")]
    Io(String),

    #[error("Failed to parse model: {0}")]
    Parse(String),

    #[error("Failed to serialize model: {0}")]
    Serialize(String),
}

impl ModelError {
    pub(crate) fn identifier(element: &str, attribute: &str, value: &str) -> Self {
        Self::InvalidIdentifier {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn field_name(element: &str, attribute: &str, value: &str) -> Self {
        Self::InvalidFieldName {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn unknown(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownResource {
            kind,
            name: name.into(),
        }
    }
}
