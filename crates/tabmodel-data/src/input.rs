//! Data input trait
//!
//! An input turns some external document into the rows the model is
//! evaluated against. Every row is a flat attribute map; attribute names
//! starting with one of the input's special characters are stored encoded
//! (see [`tabmodel_core::encode_field_name`]).

use std::path::PathBuf;

use tabmodel_core::{ModelError, Row};

/// Errors that can occur while reading an input
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to read {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Node '{0}' not found or not an array")]
    MissingNode(String),

    #[error("Unsupported document shape: {0}")]
    InvalidShape(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl InputError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

/// Where an input reads its document from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Text(String),
    File(PathBuf),
}

impl InputSource {
    pub(crate) fn read(&self) -> Result<String, InputError> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::File(path) => std::fs::read_to_string(path).map_err(|e| InputError::io(path, e)),
        }
    }
}

/// Trait for data inputs a model can be evaluated against
pub trait DataInput {
    /// Provider name shown in diagnostics and `Display` output
    fn name(&self) -> &str;

    /// Leading characters this input encodes in attribute names
    fn special_chars(&self) -> &[char];

    /// Read every row of the input
    fn rows(&self) -> Result<Vec<Row>, InputError>;
}
